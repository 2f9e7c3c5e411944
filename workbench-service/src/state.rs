//! Application state for the workbench service.

use std::sync::Arc;

use common::config::AppConfig;

use crate::service::WorkbenchService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub service: Arc<WorkbenchService>,
}

impl AppState {
    /// Creates a new application state around an initialized session.
    pub fn new(config: AppConfig, service: WorkbenchService) -> Self {
        Self {
            config,
            service: Arc::new(service),
        }
    }
}
