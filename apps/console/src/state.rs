use std::sync::Arc;

use crate::config::Config;
use crate::workflow::ReviewWorkflow;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The console's single review workflow; all handlers go through it.
    pub workflow: Arc<ReviewWorkflow>,
    pub config: Config,
}
