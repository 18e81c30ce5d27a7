//! Per-item processing tasks and their completion.
//!
//! Each accepted item gets exactly one task. The task awaits the processing
//! backend without holding any lock, then applies its single terminal
//! transition in one critical section. If the item was removed meanwhile the
//! outcome is discarded, and a freshly acquired result handle is released
//! again before the lock is dropped.

use crate::error::ProcessError;
use crate::registry::ResourceKind;
use crate::store::Transition;
use crate::types::{Event, ItemId, ProcessedImage, SourceFile};

use super::SubmissionManager;

impl SubmissionManager {
    /// Spawn the processing task for an item that already exists in the store
    ///
    /// The backend call runs on its own task so that a panicking processor
    /// still ends in a terminal transition for the item.
    pub(crate) fn submit(&self, id: ItemId, file: SourceFile) {
        let manager = self.clone();

        self.tasks.spawn(async move {
            tracing::debug!(item_id = %id, processor = manager.processor.name(), "Processing started");

            let processor = std::sync::Arc::clone(&manager.processor);
            let outcome = match tokio::spawn(async move { processor.process(&file).await }).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(item_id = %id, error = %e, "Processing task aborted");
                    Err(ProcessError::Transport(format!("processing task aborted: {e}")))
                }
            };

            manager.complete(id, outcome);
        });
    }

    /// Apply a task outcome to its item
    pub(crate) fn complete(
        &self,
        id: ItemId,
        outcome: std::result::Result<ProcessedImage, ProcessError>,
    ) {
        let mut events = Vec::new();

        {
            let mut state = self.lock_state();

            match outcome {
                Ok(processed) => {
                    let result = state.registry.acquire(
                        ResourceKind::Processed,
                        processed.bytes,
                        processed.content_type,
                    );

                    match state.store.transition_to_done(id, result) {
                        Transition::Applied => {
                            tracing::debug!(item_id = %id, %result, "Item done");
                            events.push(Event::ItemDone { id, result });
                        }
                        Transition::Discarded { reason, returned } => {
                            if let Err(e) = state.registry.release(returned) {
                                tracing::warn!(item_id = %id, error = %e, "Failed to release discarded result");
                            }
                            tracing::debug!(item_id = %id, ?reason, "Discarding late result");
                        }
                    }
                }
                Err(e) => match state.store.transition_to_error(id, e.user_message()) {
                    Transition::Applied => {
                        tracing::warn!(item_id = %id, error = %e, "Item processing failed");
                        events.push(Event::ItemFailed {
                            id,
                            error: e.user_message(),
                        });
                    }
                    Transition::Discarded { reason, .. } => {
                        tracing::debug!(item_id = %id, ?reason, error = %e, "Discarding late failure");
                    }
                },
            }

            if let Some(selected) = state.repair_selection() {
                events.push(Event::SelectionChanged { id: selected });
            }

            self.emit_events(&state, events);
        }
    }
}
