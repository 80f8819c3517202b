use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::restaurant::Restaurant;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/restaurants", post(create_restaurant))
        .route("/restaurants/:id", get(get_restaurant))
}

#[derive(Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub location: Value,
}

async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let restaurant = Restaurant {
        id: Uuid::new_v4(),
        name: payload.name,
        location: payload.location,
        created_at: Utc::now(),
    };

    state.restaurants.insert(restaurant.id, restaurant.clone());
    Ok(Json(restaurant))
}

async fn get_restaurant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Restaurant>, AppError> {
    let restaurant = state
        .restaurants
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id} not found")))?;

    Ok(Json(restaurant.value().clone()))
}
