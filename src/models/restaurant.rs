use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// The restaurant's `location` is kept in its raw wire form, a `[lng, lat]`
/// JSON array, and validated per request. A restaurant with an unparseable
/// coordinate cannot be used as a dispatch origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub location: Value,
    pub created_at: DateTime<Utc>,
}

/// Subset of restaurant fields echoed in grouping and commit responses.
/// `location` is None when the stored coordinate does not validate.
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantSummary {
    pub id: Uuid,
    pub name: String,
    pub location: Option<GeoPoint>,
}
