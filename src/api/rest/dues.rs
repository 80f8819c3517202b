use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::due::{DriverDue, DueStatus};
use crate::models::settings::DeliverySettings;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dues", get(list_dues))
        .route("/dues/:id/status", put(update_due_status))
        .route("/settings", get(get_settings).put(update_settings))
}

#[derive(Deserialize)]
pub struct DuesQuery {
    pub driver_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub restaurant_id: Option<Uuid>,
    pub status: Option<DueStatus>,
}

async fn list_dues(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DuesQuery>,
) -> Json<Vec<DriverDue>> {
    let mut dues: Vec<DriverDue> = state
        .dues
        .iter()
        .filter(|entry| {
            let due = entry.value();
            query.driver_id.is_none_or(|id| due.driver_id == id)
                && query.order_id.is_none_or(|id| due.order_id == id)
                && query.status.is_none_or(|status| due.status == status)
                && query.restaurant_id.is_none_or(|rid| {
                    // The due carries no restaurant; resolve it through the
                    // order it pays for.
                    state
                        .orders
                        .get(&due.order_id)
                        .is_some_and(|order| order.restaurant_id == rid)
                })
        })
        .map(|entry| entry.value().clone())
        .collect();

    // Newest first, matching the ledger's display order.
    dues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(dues)
}

#[derive(Deserialize)]
pub struct UpdateDueStatusRequest {
    pub status: DueStatus,
}

/// Only the settlement status may change; the amount is frozen at commit.
async fn update_due_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDueStatusRequest>,
) -> Result<Json<DriverDue>, AppError> {
    let mut due = state
        .dues
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver due {id} not found")))?;

    due.status = payload.status;
    due.updated_at = Utc::now();

    Ok(Json(due.clone()))
}

async fn get_settings(State(state): State<Arc<AppState>>) -> Json<DeliverySettings> {
    Json(*state.settings.read().await)
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub price_per_km: Option<f64>,
    pub driver_percentage: Option<f64>,
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<DeliverySettings>, AppError> {
    let mut settings = state.settings.write().await;

    if let Some(price_per_km) = payload.price_per_km {
        if !price_per_km.is_finite() || price_per_km < 0.0 {
            return Err(AppError::BadRequest(
                "price_per_km must be a non-negative number".to_string(),
            ));
        }
        settings.price_per_km = price_per_km;
    }

    if let Some(driver_percentage) = payload.driver_percentage {
        if !driver_percentage.is_finite() || !(0.0..=100.0).contains(&driver_percentage) {
            return Err(AppError::BadRequest(
                "driver_percentage must be between 0 and 100".to_string(),
            ));
        }
        settings.driver_percentage = driver_percentage;
    }

    Ok(Json(*settings))
}
