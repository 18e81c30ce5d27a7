//! Application state for the API server

use crate::{Config, SubmissionManager};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; the manager itself is a bundle of `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// The submission manager serving this API
    pub manager: SubmissionManager,

    /// Configuration (read access)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(manager: SubmissionManager, config: Arc<Config>) -> Self {
        Self { manager, config }
    }
}
