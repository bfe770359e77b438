//! Shared app state.

use std::{sync::Arc, time::Instant};

use pagecheck_audit::AuditService;

#[derive(Clone)]
pub struct AppState {
    pub audit: Arc<dyn AuditService>,
    /// Process start, for the health endpoint's uptime.
    pub started: Instant,
}

impl AppState {
    pub fn new(audit: Arc<dyn AuditService>) -> Self {
        Self {
            audit,
            started: Instant::now(),
        }
    }
}
