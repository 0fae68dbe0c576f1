//! Application state for the Attendance Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, ReconcileConfig};

/// Shared application state.
///
/// Holds the validated reconciliation configuration every request runs
/// against.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ReconcileConfig>,
}

impl AppState {
    /// Creates the state from a loaded configuration.
    pub fn new(loader: ConfigLoader) -> Self {
        Self {
            config: Arc::new(loader.into_config()),
        }
    }

    /// Returns the reconciliation configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }
}
