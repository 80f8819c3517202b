use dashmap::DashMap;
use tokio::sync::{broadcast, Mutex, RwLock};
use uuid::Uuid;

use crate::models::due::DriverDue;
use crate::models::grouping::CommitEvent;
use crate::models::order::Order;
use crate::models::restaurant::Restaurant;
use crate::models::settings::DeliverySettings;
use crate::models::user::User;
use crate::observability::metrics::Metrics;

#[derive(Debug, Clone, Copy)]
pub struct GroupingDefaults {
    pub max_group_size: usize,
    pub max_distance_km: f64,
}

pub struct AppState {
    pub orders: DashMap<Uuid, Order>,
    pub restaurants: DashMap<Uuid, Restaurant>,
    pub users: DashMap<Uuid, User>,
    pub dues: DashMap<Uuid, DriverDue>,
    pub settings: RwLock<DeliverySettings>,
    /// Serializes commits and order status writes so a batch's precondition
    /// check and write are atomic with respect to every other order mutation.
    pub commit_lock: Mutex<()>,
    pub commit_events_tx: broadcast::Sender<CommitEvent>,
    pub defaults: GroupingDefaults,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, defaults: GroupingDefaults) -> Self {
        let (commit_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: DashMap::new(),
            restaurants: DashMap::new(),
            users: DashMap::new(),
            dues: DashMap::new(),
            settings: RwLock::new(DeliverySettings::default()),
            commit_lock: Mutex::new(()),
            commit_events_tx,
            defaults,
            metrics: Metrics::new(),
        }
    }
}

impl Default for GroupingDefaults {
    fn default() -> Self {
        Self {
            max_group_size: 3,
            max_distance_km: 5.0,
        }
    }
}
