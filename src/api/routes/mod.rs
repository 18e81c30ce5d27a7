//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`items`] - Submission, listing, removal and resources
//! - [`selection`] - The active item
//! - [`system`] - Health, events, OpenAPI

use crate::types::ItemId;
use serde::{Deserialize, Serialize};

mod items;
mod selection;
mod system;

pub use items::*;
pub use selection::*;
pub use system::*;

/// Request body for PUT /selection
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SelectRequest {
    /// Item to select
    pub id: ItemId,
}

/// Response for GET /health
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Always "ok" when the server answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Name of the processing backend
    pub processor: String,
    /// Whether new files are accepted
    pub accepting: bool,
    /// Number of items in the store
    pub items: usize,
    /// Number of processing tasks still running
    pub in_flight: usize,
}
