//! # imgbatch
//!
//! Concurrent per-item image submission manager.
//!
//! Hand it a batch of files and every image becomes an independent item with
//! its own lifecycle: `loading` while its upload+process round trip is in
//! flight, then exactly one terminal transition to `done` or `error`. One item
//! is "selected" for display at any time, and every binary resource shown to
//! the user (original previews, processed results) is tracked by a handle
//! registry so nothing leaks, even when items are removed mid-flight.
//!
//! ## Design Philosophy
//!
//! - **Per-item isolation** - A failing item never affects its siblings
//! - **No cancellation** - Removed items keep their task; the late outcome is discarded
//! - **Library-first** - Embed the manager; the REST API is an optional surface
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use imgbatch::{Config, SourceFile, SubmissionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = SubmissionManager::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = manager.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let outcome = manager
//!         .add_files(vec![SourceFile::new(
//!             "cat.png",
//!             Some("image/png"),
//!             std::fs::read("cat.png")?,
//!         )])
//!         .await?;
//!     println!("accepted {:?}", outcome.accepted);
//!
//!     manager.wait_idle().await;
//!     for item in manager.items() {
//!         println!("{} {} {:?}", item.id, item.status, item.error);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

use std::time::Duration;

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Submission manager (decomposed into focused submodules)
pub mod manager;
/// Processing backends
pub mod processor;
/// Resource handle registry
pub mod registry;
/// Selection controller
pub mod selection;
/// Item store
pub mod store;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{ApiConfig, Config, ProcessingConfig, SubmissionConfig};
pub use error::{
    ApiError, Error, ErrorDetail, ItemError, ProcessError, ResourceError, Result, ToHttpStatus,
};
pub use manager::SubmissionManager;
pub use processor::{HttpProcessor, ImageProcessor};
pub use registry::{Resource, ResourceHandle, ResourceKind};
pub use types::{
    AddFilesOutcome, Event, ItemId, ItemInfo, ItemStatus, ProcessedImage, RejectReason,
    RejectedFile, SelectionInfo, SourceFile,
};

/// Helper function to run the manager with graceful signal handling.
///
/// Waits for a termination signal, then tears the manager down and gives
/// in-flight processing tasks up to `grace` to finish. Their outcomes are
/// discarded either way.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Returns whether every task finished within the grace period.
///
/// # Example
///
/// ```no_run
/// use imgbatch::{Config, SubmissionManager, run_with_shutdown};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let manager = SubmissionManager::new(Config::default())?;
///     let _api = manager.spawn_api_server();
///
///     // Run with automatic signal handling
///     run_with_shutdown(manager, Duration::from_secs(10)).await;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(manager: SubmissionManager, grace: Duration) -> bool {
    wait_for_signal().await;
    manager.shutdown(grace).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
