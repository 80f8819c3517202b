use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DueStatus {
    Pending,
    Paid,
    Cancelled,
}

/// Payout ledger entry, created exactly once when a driver is assigned to an
/// order. `amount` is frozen at creation; only `status` evolves afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDue {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub order_id: Uuid,
    pub amount: f64,
    pub status: DueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
