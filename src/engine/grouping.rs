use tracing::info;
use uuid::Uuid;

use crate::engine::cost::estimate_route;
use crate::engine::partition::{PartitionParams, Strategy};
use crate::engine::sequence::sequence_routes;
use crate::error::AppError;
use crate::geo::{haversine_km, parse_location};
use crate::models::grouping::{Candidate, GroupingStats, SuggestResponse};
use crate::models::order::Order;
use crate::models::restaurant::{GeoPoint, RestaurantSummary};
use crate::state::AppState;

/// Validates eligible orders into candidates, dropping any whose stored
/// location is malformed. The dropped count is reported, never fatal.
pub fn build_candidates(
    orders: &[Order],
    origin: &GeoPoint,
) -> (Vec<Candidate>, usize) {
    let mut candidates = Vec::with_capacity(orders.len());
    let mut invalid = 0usize;

    for order in orders {
        match parse_location(&order.location) {
            Some(location) => candidates.push(Candidate {
                order_id: order.id,
                customer_name: order.customer_name.clone(),
                customer_email: order.customer_email.clone(),
                address: order.address.clone(),
                location,
                delivery_price: order.delivery_price,
                distance_from_restaurant_km: haversine_km(origin, &location),
            }),
            None => invalid += 1,
        }
    }

    (candidates, invalid)
}

/// One-shot grouping suggestion: candidate build → spatial partition →
/// nearest-neighbor sequencing → cost estimate. Read-only; nothing is
/// reserved, and concurrent callers may be shown overlapping candidates.
pub fn suggest_groupings(
    state: &AppState,
    restaurant_id: Uuid,
    params: PartitionParams,
    strategy: Strategy,
) -> Result<SuggestResponse, AppError> {
    let restaurant = state
        .restaurants
        .get(&restaurant_id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {restaurant_id} not found")))?
        .clone();

    let origin = parse_location(&restaurant.location).ok_or_else(|| {
        AppError::NotFound(format!(
            "restaurant {restaurant_id} has no valid coordinate"
        ))
    })?;

    let eligible: Vec<Order> = state
        .orders
        .iter()
        .filter(|entry| {
            let order = entry.value();
            order.restaurant_id == restaurant_id && order.is_candidate()
        })
        .map(|entry| entry.value().clone())
        .collect();

    let total_orders = eligible.len();
    let (candidates, invalid_locations) = build_candidates(&eligible, &origin);
    let valid_orders = candidates.len();

    if invalid_locations > 0 {
        state
            .metrics
            .invalid_location_orders_total
            .inc_by(invalid_locations as u64);
    }

    let groupings = if candidates.is_empty() {
        Vec::new()
    } else {
        let clusters = strategy
            .partitioner()
            .partition(candidates, &origin, &params);

        clusters
            .into_iter()
            .flat_map(|cluster| sequence_routes(cluster, &origin, params.max_group_size))
            .map(|route| estimate_route(route, &origin))
            .collect()
    };

    let stats = GroupingStats {
        total_orders,
        valid_orders,
        invalid_locations,
        total_groups: groupings.len(),
    };

    info!(
        restaurant_id = %restaurant_id,
        strategy = ?strategy,
        valid_orders,
        invalid_locations,
        total_groups = stats.total_groups,
        "grouping suggestion computed"
    );

    Ok(SuggestResponse {
        success: true,
        restaurant: RestaurantSummary {
            id: restaurant.id,
            name: restaurant.name,
            location: Some(origin),
        },
        groupings,
        stats,
    })
}
