//! Application state for Axum handlers.

use hypercache_service::CacheService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub cache_service: Arc<dyn CacheService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(cache_service: Arc<dyn CacheService>) -> Self {
        Self { cache_service }
    }
}
