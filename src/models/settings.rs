use serde::{Deserialize, Serialize};

/// Global delivery settings. A single record; both fields have the backend's
/// historical fallback values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub price_per_km: f64,
    pub driver_percentage: f64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            price_per_km: 1.5,
            driver_percentage: 20.0,
        }
    }
}
