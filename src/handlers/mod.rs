pub mod common;
pub mod maintenance_requests;

use crate::{db::DbPool, events::EventSender, services::MaintenanceRequestService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub maintenance_requests: Arc<MaintenanceRequestService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            maintenance_requests: Arc::new(MaintenanceRequestService::new(db_pool, event_sender)),
        }
    }
}
