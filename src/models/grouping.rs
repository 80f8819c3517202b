use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::due::DriverDue;
use crate::models::restaurant::{GeoPoint, RestaurantSummary};
use crate::models::user::PublicUser;

/// A Processing, driver-less order with a validated delivery coordinate.
///
/// This is the unit the partitioner and sequencer work on; the raw user
/// document is narrowed down to the public fields a dispatcher UI may see.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub order_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub address: String,
    pub location: GeoPoint,
    pub delivery_price: f64,
    pub distance_from_restaurant_km: f64,
}

/// One stop on a suggested route, with the incremental distance from the
/// previous position (restaurant for the first stop).
#[derive(Debug, Clone, Serialize)]
pub struct RouteStop {
    pub leg_km: f64,
    #[serde(flatten)]
    pub order: Candidate,
}

/// A sequenced, size-bounded driver trip. Ephemeral: returned as a
/// suggestion, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RouteGroup {
    pub stops: Vec<RouteStop>,
    pub total_distance_km: f64,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GroupingStats {
    pub total_orders: usize,
    pub valid_orders: usize,
    pub invalid_locations: usize,
    pub total_groups: usize,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub success: bool,
    pub restaurant: RestaurantSummary,
    pub groupings: Vec<RouteGroup>,
    pub stats: GroupingStats,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub success: bool,
    pub message: String,
    pub driver: PublicUser,
    pub restaurant: RestaurantSummary,
    pub assigned_count: usize,
    pub dues: Vec<DriverDue>,
}

/// Broadcast to websocket subscribers when a batch commit succeeds.
#[derive(Debug, Clone, Serialize)]
pub struct CommitEvent {
    pub driver_id: Uuid,
    pub restaurant_id: Uuid,
    pub order_ids: Vec<Uuid>,
    pub assigned_at: DateTime<Utc>,
}
