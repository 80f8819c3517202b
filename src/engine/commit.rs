use std::collections::HashSet;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::due::{DriverDue, DueStatus};
use crate::models::grouping::{CommitEvent, CommitResponse};
use crate::models::order::OrderStatus;
use crate::models::restaurant::RestaurantSummary;
use crate::models::user::{PublicUser, Role};
use crate::state::AppState;

/// Atomically assigns a driver to a batch of orders.
///
/// The whole batch is validated before any write: every order must exist, be
/// in Processing status, have no driver, and belong to one restaurant. Any
/// failure rejects the batch with the offending ids; no partial commits.
/// Validation and the writes run under `state.commit_lock`, so a racing
/// commit on overlapping orders observes the first one's writes and fails
/// with a conflict instead of double-assigning.
///
/// On success every order flips to Shipping and one DriverDue is created per
/// order with `amount = delivery_price × driver_percentage / 100`, frozen at
/// commit time.
pub async fn commit_assignment(
    state: &AppState,
    order_ids: &[Uuid],
    driver_id: Uuid,
) -> Result<CommitResponse, AppError> {
    if order_ids.is_empty() {
        return Err(AppError::BadRequest("order_ids must not be empty".to_string()));
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<Uuid> = order_ids
        .iter()
        .filter(|id| !seen.insert(**id))
        .copied()
        .collect();
    if !duplicates.is_empty() {
        return Err(AppError::InvalidOrders {
            reason: "duplicate order ids in batch".to_string(),
            order_ids: duplicates,
        });
    }

    let driver = state
        .users
        .get(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?
        .clone();
    if driver.role != Role::Driver {
        return Err(AppError::BadRequest(format!(
            "user {driver_id} is not a driver"
        )));
    }

    let _guard = state.commit_lock.lock().await;

    let mut missing = Vec::new();
    let mut already_assigned = Vec::new();
    let mut wrong_status = Vec::new();
    let mut restaurant_ids = HashSet::new();

    for id in order_ids {
        match state.orders.get(id) {
            None => missing.push(*id),
            Some(order) => {
                if order.driver_id.is_some() {
                    already_assigned.push(*id);
                } else if order.status != OrderStatus::Processing {
                    wrong_status.push(*id);
                } else {
                    restaurant_ids.insert(order.restaurant_id);
                }
            }
        }
    }

    if !missing.is_empty() {
        return Err(AppError::InvalidOrders {
            reason: "orders not found".to_string(),
            order_ids: missing,
        });
    }
    if !already_assigned.is_empty() {
        return Err(AppError::Conflict {
            reason: "orders already assigned to a driver".to_string(),
            order_ids: already_assigned,
        });
    }
    if !wrong_status.is_empty() {
        return Err(AppError::InvalidOrders {
            reason: "orders are not in Processing status".to_string(),
            order_ids: wrong_status,
        });
    }
    if restaurant_ids.len() > 1 {
        return Err(AppError::BadRequest(
            "orders span multiple restaurants".to_string(),
        ));
    }

    let restaurant_id = restaurant_ids
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("validated batch has no restaurant".to_string()))?;
    let restaurant = state
        .restaurants
        .get(&restaurant_id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {restaurant_id} not found")))?
        .clone();
    let restaurant_location = crate::geo::parse_location(&restaurant.location);

    let driver_percentage = state.settings.read().await.driver_percentage;

    // Validation passed; nothing below can fail, so the batch applies fully.
    let now = Utc::now();
    let mut dues = Vec::with_capacity(order_ids.len());
    for id in order_ids {
        let amount = if let Some(mut order) = state.orders.get_mut(id) {
            order.status = OrderStatus::Shipping;
            order.driver_id = Some(driver_id);
            order.delivery_price * driver_percentage / 100.0
        } else {
            continue;
        };

        let due = DriverDue {
            id: Uuid::new_v4(),
            driver_id,
            order_id: *id,
            amount,
            status: DueStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.dues.insert(due.id, due.clone());
        dues.push(due);
    }

    let event = CommitEvent {
        driver_id,
        restaurant_id,
        order_ids: order_ids.to_vec(),
        assigned_at: now,
    };
    let _ = state.commit_events_tx.send(event);

    state.metrics.orders_committed_total.inc_by(order_ids.len() as u64);

    info!(
        driver_id = %driver_id,
        restaurant_id = %restaurant_id,
        assigned_count = order_ids.len(),
        "driver assigned to order group"
    );

    Ok(CommitResponse {
        success: true,
        message: "driver assigned successfully".to_string(),
        driver: PublicUser::from(&driver),
        restaurant: RestaurantSummary {
            id: restaurant.id,
            name: restaurant.name,
            location: restaurant_location,
        },
        assigned_count: order_ids.len(),
        dues,
    })
}
