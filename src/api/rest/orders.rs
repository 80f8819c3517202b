use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::engine::commit::commit_assignment;
use crate::engine::grouping::suggest_groupings;
use crate::engine::partition::{PartitionParams, Strategy};
use crate::error::AppError;
use crate::geo::{haversine_km, parse_location};
use crate::models::grouping::{CommitResponse, SuggestResponse};
use crate::models::order::{Order, OrderStatus, ProductLine};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/suggest-groupings", get(suggest))
        .route("/orders/assign-driver-to-group", post(assign_driver_to_group))
        .route("/orders/assign-driver", post(assign_driver))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", patch(update_order_status))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub restaurant_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub address: String,
    #[serde(default)]
    pub products: Vec<ProductLine>,
    pub location: Value,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let restaurant = state
        .restaurants
        .get(&payload.restaurant_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("restaurant {} not found", payload.restaurant_id))
        })?
        .clone();

    let items_total: f64 = payload
        .products
        .iter()
        .map(|line| line.price * f64::from(line.quantity))
        .sum();

    // Delivery fee is distance-based when both coordinates validate;
    // malformed locations fall back to zero and get filtered at grouping.
    let delivery_price = match (
        parse_location(&restaurant.location),
        parse_location(&payload.location),
    ) {
        (Some(origin), Some(dropoff)) => {
            let price_per_km = state.settings.read().await.price_per_km;
            (haversine_km(&origin, &dropoff) * price_per_km).round()
        }
        _ => 0.0,
    };

    let order = Order {
        id: Uuid::new_v4(),
        restaurant_id: payload.restaurant_id,
        customer_name: payload.customer_name,
        customer_email: payload.customer_email,
        address: payload.address,
        products: payload.products,
        amount: (items_total + delivery_price).round(),
        delivery_price,
        location: payload.location,
        status: OrderStatus::Pending,
        driver_id: None,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    Ok(Json(order))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.value().clone()))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Kitchen-side status transitions. Shipping is reserved for the driver
/// commit path, which also creates the payout record.
async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    if payload.status == OrderStatus::Shipping {
        return Err(AppError::BadRequest(
            "Shipping is set by driver assignment, not directly".to_string(),
        ));
    }

    // Status writes hold the commit lock: an order validated by an in-flight
    // batch commit cannot be flipped before the commit's writes land.
    let _guard = state.commit_lock.lock().await;

    let mut order = state
        .orders
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    if !order.status.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "cannot transition from {:?} to {:?}",
            order.status, payload.status
        )));
    }

    order.status = payload.status;
    Ok(Json(order.clone()))
}

#[derive(Deserialize)]
pub struct SuggestQuery {
    pub restaurant_id: Option<String>,
    pub max_group_size: Option<usize>,
    pub max_distance_km: Option<f64>,
    pub strategy: Option<Strategy>,
}

async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    let raw_id = query
        .restaurant_id
        .ok_or_else(|| AppError::BadRequest("restaurant_id is required".to_string()))?;
    let restaurant_id = Uuid::parse_str(&raw_id)
        .map_err(|_| AppError::BadRequest(format!("invalid restaurant_id: {raw_id}")))?;

    let max_group_size = query
        .max_group_size
        .unwrap_or(state.defaults.max_group_size);
    if max_group_size == 0 {
        return Err(AppError::BadRequest(
            "max_group_size must be at least 1".to_string(),
        ));
    }

    let max_distance_km = query
        .max_distance_km
        .unwrap_or(state.defaults.max_distance_km);
    if !max_distance_km.is_finite() || max_distance_km <= 0.0 {
        return Err(AppError::BadRequest(
            "max_distance_km must be a positive number".to_string(),
        ));
    }

    let params = PartitionParams {
        max_group_size,
        max_distance_km,
    };
    let strategy = query.strategy.unwrap_or_default();

    let start = Instant::now();
    let result = suggest_groupings(&state, restaurant_id, params, strategy);
    let elapsed = start.elapsed().as_secs_f64();

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .suggestion_latency_seconds
        .with_label_values(&[outcome])
        .observe(elapsed);
    state
        .metrics
        .suggestions_total
        .with_label_values(&[outcome])
        .inc();

    if let Err(err) = &result {
        error!(restaurant_id = %restaurant_id, error = %err, "grouping suggestion failed");
    }

    result.map(Json)
}

#[derive(Deserialize)]
pub struct AssignGroupRequest {
    pub order_ids: Vec<Uuid>,
    pub driver_id: Uuid,
}

async fn assign_driver_to_group(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignGroupRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let result = commit_assignment(&state, &payload.order_ids, payload.driver_id).await;

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .commits_total
        .with_label_values(&[outcome])
        .inc();

    result.map(Json)
}

#[derive(Deserialize)]
pub struct AssignOrderRequest {
    pub order_id: Uuid,
    pub driver_id: Uuid,
}

/// Single-order assignment goes through the same commit path as a batch of
/// one, so it gets the same preconditions and payout bookkeeping.
async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignOrderRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let result = commit_assignment(&state, &[payload.order_id], payload.driver_id).await;

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .commits_total
        .with_label_values(&[outcome])
        .inc();

    result.map(Json)
}
