//! Error types for imgbatch
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Item, Resource, Process, Config)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes
//! - The user-facing message policy for failed processing tasks

use crate::registry::ResourceHandle;
use crate::types::{ItemId, ItemStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for imgbatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the backend rejected a file without explaining why
pub const PROCESSING_FAILED_MESSAGE: &str = "Processing failed";

/// Message shown when the file never made it through the network round trip
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed, please try again";

/// Main error type for imgbatch
///
/// Each variant includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoint_url")
        key: Option<String>,
    },

    /// Item-related error
    #[error("item error: {0}")]
    Item(#[from] ItemError),

    /// Resource handle misuse
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Processing backend failure
    #[error("processing error: {0}")]
    Process(#[from] ProcessError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request for a route the API does not serve
    #[error("not found: {0}")]
    NotFound(String),

    /// Manager was torn down and no longer accepts submissions
    #[error("shutdown in progress: not accepting new files")]
    ShuttingDown,

    /// HTTP client construction or request error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Item-related errors
#[derive(Debug, Error)]
pub enum ItemError {
    /// No item with this id is present in the store
    #[error("item {id} not found")]
    NotFound {
        /// The item id that was not found
        id: ItemId,
    },

    /// The item has no processed result to hand out
    #[error("item {id} has no result while {status}")]
    NoResult {
        /// The item id that was asked for its result
        id: ItemId,
        /// The status the item is currently in
        status: ItemStatus,
    },
}

/// Resource handle errors
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The handle is not registered (never acquired, or already released)
    #[error("handle {handle} is not registered")]
    UnknownHandle {
        /// The offending handle
        handle: ResourceHandle,
    },
}

/// Failure of a single upload+process round trip
///
/// These never escape a task: the runner converts them into the item's
/// `Error` state through [`ProcessError::user_message`].
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The request could not be sent or no response arrived
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("backend rejected the file with status {status}")]
    Rejected {
        /// HTTP status code returned by the backend
        status: u16,
        /// Body text, when the backend supplied a non-blank textual body
        message: Option<String>,
    },

    /// The response arrived but its body could not be read
    #[error("failed to read processed payload: {0}")]
    PayloadRead(String),
}

impl ProcessError {
    /// Message stored on the item when its task fails
    ///
    /// The backend's own text wins when it sent one; otherwise a generic
    /// message is used, distinguishing a refusal from a broken round trip.
    pub fn user_message(&self) -> String {
        match self {
            ProcessError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ProcessError::Rejected { message: None, .. } => PROCESSING_FAILED_MESSAGE.to_string(),
            ProcessError::Transport(_) | ProcessError::PayloadRead(_) => {
                UPLOAD_FAILED_MESSAGE.to_string()
            }
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "item_not_found",
///     "message": "item error: item 12 not found",
///     "details": { "item_id": 12 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "item_not_found", "missing_file")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 400,

            Error::NotFound(_) => 404,
            Error::Item(ItemError::NotFound { .. }) => 404,
            Error::Resource(ResourceError::UnknownHandle { .. }) => 404,

            // The item exists but is not in a state that has a result
            Error::Item(ItemError::NoResult { .. }) => 409,

            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            Error::Process(_) => 502,
            Error::Network(_) => 502,

            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Item(e) => match e {
                ItemError::NotFound { .. } => "item_not_found",
                ItemError::NoResult { .. } => "result_not_available",
            },
            Error::Resource(ResourceError::UnknownHandle { .. }) => "unknown_handle",
            Error::Process(e) => match e {
                ProcessError::Transport(_) => "transport_error",
                ProcessError::Rejected { .. } => "backend_rejected",
                ProcessError::PayloadRead(_) => "payload_read_error",
            },
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::ShuttingDown => "shutting_down",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Item(ItemError::NotFound { id }) => Some(serde_json::json!({
                "item_id": id,
            })),
            Error::Item(ItemError::NoResult { id, status }) => Some(serde_json::json!({
                "item_id": id,
                "status": status,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Process(ProcessError::Rejected { status, .. }) => Some(serde_json::json!({
                "backend_status": status,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
