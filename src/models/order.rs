use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipping,
    Delivered,
    Cancelled,
}

/// Denormalized product line carried through unchanged for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLine {
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

/// A customer order against a single restaurant.
///
/// `location` is the delivery coordinate in raw wire form (`[lng, lat]`).
/// It is deliberately not parsed at ingest: upstream data contains malformed
/// locations, and the grouping engine filters those out rather than rejecting
/// the whole order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub address: String,
    pub products: Vec<ProductLine>,
    pub amount: f64,
    pub delivery_price: f64,
    pub location: Value,
    pub status: OrderStatus,
    pub driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl OrderStatus {
    /// Forward-only lifecycle. Shipping is entered through driver assignment,
    /// any active order can still be cancelled, and terminal states never
    /// change.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipping)
                | (Processing, Cancelled)
                | (Shipping, Delivered)
                | (Shipping, Cancelled)
        )
    }
}

impl Order {
    /// Eligible for grouping: kitchen-ready and not yet claimed by a driver.
    pub fn is_candidate(&self) -> bool {
        self.status == OrderStatus::Processing && self.driver_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus;

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipping));
        assert!(OrderStatus::Shipping.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipping.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn any_active_order_can_be_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipping.can_transition_to(OrderStatus::Cancelled));
    }
}
