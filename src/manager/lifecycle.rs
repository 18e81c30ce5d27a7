//! Teardown, shutdown and in-flight tracking.

use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::types::Event;

use super::SubmissionManager;

impl SubmissionManager {
    /// Release every handle, drop every item and stop accepting files
    ///
    /// Tasks still in flight keep running; whatever they return later is
    /// discarded and its handle released. Calling this more than once logs a
    /// warning and does nothing.
    ///
    /// Returns whether this call performed the teardown.
    pub fn teardown(&self) -> bool {
        let (items, handles) = {
            let mut state = self.lock_state();

            if !self.accepting_new.swap(false, Ordering::SeqCst) {
                tracing::warn!("Teardown already performed, ignoring");
                return false;
            }

            let drained = state.store.drain();
            let handles = state.registry.release_all();

            let mut events = Vec::with_capacity(2);
            if state.selection.clear() {
                events.push(Event::SelectionChanged { id: None });
            }
            events.push(Event::Teardown);
            self.emit_events(&state, events);

            (drained.len(), handles)
        };

        // No further tasks can be spawned; lets `shutdown` wait on the tracker
        self.tasks.close();

        tracing::info!(
            items,
            handles,
            in_flight = self.tasks.len(),
            "Teardown complete"
        );

        true
    }

    /// Tear down, then wait up to `grace` for in-flight tasks to finish
    ///
    /// Outcomes of the drained tasks are discarded. Returns `true` if every
    /// task finished within the grace period.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        tracing::info!(in_flight = self.tasks.len(), "Initiating graceful shutdown");

        self.teardown();

        match tokio::time::timeout(grace, self.tasks.wait()).await {
            Ok(()) => {
                tracing::info!("All processing tasks finished");
                true
            }
            Err(_) => {
                tracing::warn!(
                    in_flight = self.tasks.len(),
                    "Timeout waiting for processing tasks, proceeding with shutdown"
                );
                false
            }
        }
    }

    /// Wait until no processing task is running
    ///
    /// Every completion has been applied to the store once this resolves.
    /// Tasks blocked on a backend that never answers keep this pending.
    pub async fn wait_idle(&self) {
        loop {
            let in_flight = self.tasks.len();
            if in_flight == 0 {
                return;
            }

            tracing::trace!(in_flight, "Waiting for processing tasks to complete");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Number of processing tasks still running
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the manager still accepts files
    pub fn is_accepting(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }
}
