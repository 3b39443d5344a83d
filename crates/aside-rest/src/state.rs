//! Application state for Axum handlers.

use aside_core::HealthCheck;
use aside_service::UserService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Probe for the origin store; readiness depends on it.
    pub store_health: Arc<dyn HealthCheck>,
    /// Probe for the cache; reported but never required.
    pub cache_health: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        store_health: Arc<dyn HealthCheck>,
        cache_health: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            user_service,
            store_health,
            cache_health,
        }
    }
}
