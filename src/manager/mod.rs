//! Submission manager split into focused submodules.
//!
//! The `SubmissionManager` struct and its methods are organized by domain:
//! - [`submission`] - Accepting files and creating items
//! - [`runner`] - Per-item processing tasks and their completion
//! - [`control`] - Removal, selection and the read model
//! - [`lifecycle`] - Teardown, shutdown and in-flight tracking

mod control;
mod lifecycle;
mod runner;
mod submission;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::Result;
use crate::processor::{HttpProcessor, ImageProcessor};
use crate::registry::HandleRegistry;
use crate::selection::SelectionController;
use crate::store::ItemStore;
use crate::types::{Event, ItemId};

/// Mutable state shared by every operation and every task
///
/// All three parts change together: a store mutation is always followed by
/// selection repair in the same critical section, and handles are acquired
/// or released in the same section as the item that owns them.
#[derive(Debug, Default)]
pub(crate) struct ManagerState {
    pub(crate) store: ItemStore,
    pub(crate) registry: HandleRegistry,
    pub(crate) selection: SelectionController,
}

impl ManagerState {
    /// Re-run selection fallback after a store mutation
    ///
    /// Returns the new selection when it changed.
    pub(crate) fn repair_selection(&mut self) -> Option<Option<ItemId>> {
        let ids = self.store.ids();
        self.selection
            .on_store_changed(&ids)
            .then(|| self.selection.current())
    }
}

/// Concurrent image submission manager (cloneable - all fields are Arc-wrapped)
///
/// Accepts image files, creates one item per file, and processes every item
/// on its own task. Items complete independently and in any order; a removed
/// item's late result is released instead of being attached.
#[derive(Clone)]
pub struct SubmissionManager {
    /// Item store, handle registry and selection (never locked across `.await`)
    pub(crate) state: std::sync::Arc<std::sync::Mutex<ManagerState>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: std::sync::Arc<Config>,
    /// Processing backend (trait object for pluggable implementations)
    pub(crate) processor: std::sync::Arc<dyn ImageProcessor>,
    /// Tracks spawned processing tasks
    pub(crate) tasks: tokio_util::task::TaskTracker,
    /// Whether new files are accepted (set to false by teardown)
    pub(crate) accepting_new: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl std::fmt::Debug for SubmissionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionManager")
            .field("processor", &self.processor.name())
            .field("in_flight", &self.tasks.len())
            .field(
                "accepting_new",
                &self
                    .accepting_new
                    .load(std::sync::atomic::Ordering::SeqCst),
            )
            .finish_non_exhaustive()
    }
}

impl SubmissionManager {
    /// Create a manager that sends files to the configured HTTP endpoint
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration is
    /// invalid, or [`Error::Network`](crate::Error::Network) if the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let processor = HttpProcessor::new(&config.processing)?;
        Self::with_processor(config, std::sync::Arc::new(processor))
    }

    /// Create a manager around a custom processing backend
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the configuration is
    /// invalid.
    pub fn with_processor(
        config: Config,
        processor: std::sync::Arc<dyn ImageProcessor>,
    ) -> Result<Self> {
        config.validate()?;

        let (event_tx, _rx) =
            tokio::sync::broadcast::channel(config.submission.event_channel_capacity);

        tracing::info!(
            processor = processor.name(),
            event_capacity = config.submission.event_channel_capacity,
            "Submission manager created"
        );

        Ok(Self {
            state: std::sync::Arc::new(std::sync::Mutex::new(ManagerState::default())),
            event_tx,
            config: std::sync::Arc::new(config),
            processor,
            tasks: tokio_util::task::TaskTracker::new(),
            accepting_new: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true)),
        })
    }

    /// Subscribe to item lifecycle events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events
    /// independently. A subscriber that falls behind by more than the
    /// configured channel capacity receives `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imgbatch::{Config, SubmissionManager};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let manager = SubmissionManager::new(Config::default())?;
    ///
    ///     let mut events = manager.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             println!("{event:?}");
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> std::sync::Arc<Config> {
        std::sync::Arc::clone(&self.config)
    }

    /// Name of the processing backend in use
    pub fn processor_name(&self) -> &'static str {
        self.processor.name()
    }

    /// Lock the shared state
    ///
    /// A panic while holding the lock cannot leave the state half-updated in a
    /// way later operations would trip over, so poisoning is ignored.
    pub(crate) fn lock_state(&self) -> std::sync::MutexGuard<'_, ManagerState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Emit events to all subscribers, in order
    ///
    /// Takes the locked state so events go out in the same order as the
    /// mutations they describe; `send` never blocks. With no subscribers the
    /// events are dropped.
    pub(crate) fn emit_events(
        &self,
        _state: &ManagerState,
        events: impl IntoIterator<Item = Event>,
    ) {
        for event in events {
            // send() returns Err if there are no receivers, which is fine
            self.event_tx.send(event).ok();
        }
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server listens on the configured bind address
    /// (default: 127.0.0.1:6789).
    pub fn spawn_api_server(&self) -> tokio::task::JoinHandle<Result<()>> {
        let manager = self.clone();
        let config = self.get_config();

        tokio::spawn(async move { crate::api::start_api_server(manager, config).await })
    }
}
