use std::sync::Arc;

use crate::jobs::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable job store. Postgres in production, in-memory for dev and tests.
    pub jobs: Arc<dyn JobStore>,
}

impl AppState {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        AppState { jobs }
    }
}
