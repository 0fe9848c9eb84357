//! Application state for dependency injection.

use std::sync::Arc;

use common::JwtKeys;
use order_service_lib::infra::Database;
use order_service_lib::service::ServiceContainer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    pub database: Database,
    pub keys: Arc<JwtKeys>,
}

impl AppState {
    /// Create new app state.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Database, keys: Arc<JwtKeys>) -> Self {
        Self {
            services,
            database,
            keys,
        }
    }
}
