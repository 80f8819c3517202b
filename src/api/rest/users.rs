use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::{PublicUser, Role, User};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(create_user))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub restaurant_id: Option<Uuid>,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<PublicUser>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::BadRequest("username cannot be empty".to_string()));
    }

    let user = User {
        id: Uuid::new_v4(),
        username: payload.username,
        email: payload.email,
        password: payload.password,
        role: payload.role,
        restaurant_id: payload.restaurant_id,
        created_at: Utc::now(),
    };

    // The response is the public projection; the stored password and role
    // never travel back out.
    let public = PublicUser::from(&user);
    state.users.insert(user.id, user);
    Ok(Json(public))
}
