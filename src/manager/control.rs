//! Removal, selection and the read model.

use crate::error::{ItemError, ResourceError, Result};
use crate::registry::{Resource, ResourceHandle, ResourceKind};
use crate::types::{Event, ItemId, ItemInfo, ItemState, SelectionInfo};

use super::SubmissionManager;

impl SubmissionManager {
    /// Remove an item and release its handles
    ///
    /// Removal, handle release and selection repair happen in one critical
    /// section. An item that is still processing keeps its task running; the
    /// late outcome is discarded when it arrives.
    ///
    /// Returns the removed item's last snapshot, or `None` if no such item
    /// exists (a no-op).
    pub fn remove_item(&self, id: ItemId) -> Option<ItemInfo> {
        let mut state = self.lock_state();
        let removed = state.store.remove(id)?;

        for handle in removed.handles() {
            if let Err(e) = state.registry.release(handle) {
                tracing::warn!(item_id = %id, error = %e, "Handle already released");
            }
        }

        let mut events = vec![Event::ItemRemoved { id }];
        if let Some(selected) = state.repair_selection() {
            events.push(Event::SelectionChanged { id: selected });
        }
        self.emit_events(&state, events);
        drop(state);

        tracing::debug!(item_id = %id, status = %removed.info.status, "Item removed");

        Some(removed.info)
    }

    /// Make `id` the active item
    ///
    /// The id is not checked against the store; a dangling selection is
    /// repaired by the next store change. Returns whether the selection
    /// changed.
    pub fn select(&self, id: ItemId) -> bool {
        let mut state = self.lock_state();
        let changed = state.selection.select(id);
        if changed {
            self.emit_events(&state, [Event::SelectionChanged { id: Some(id) }]);
            drop(state);
            tracing::debug!(item_id = %id, "Selection changed");
        }
        changed
    }

    /// Currently selected item id
    pub fn current(&self) -> Option<ItemId> {
        self.lock_state().selection.current()
    }

    /// Current selection together with the selected item's snapshot
    pub fn selected_item(&self) -> SelectionInfo {
        let state = self.lock_state();
        let id = state.selection.current();
        let item = id.and_then(|id| state.store.get(id)).map(|item| item.info());
        SelectionInfo { id, item }
    }

    /// Snapshot of every item in submission order
    pub fn items(&self) -> Vec<ItemInfo> {
        self.lock_state().store.all()
    }

    /// Snapshot of one item
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::NotFound`] if the item is not in the store.
    pub fn item(&self, id: ItemId) -> Result<ItemInfo> {
        self.lock_state()
            .store
            .get(id)
            .map(|item| item.info())
            .ok_or_else(|| ItemError::NotFound { id }.into())
    }

    /// Bytes behind a live handle
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownHandle`] once the handle was released.
    pub fn resource(&self, handle: ResourceHandle) -> Result<Resource> {
        self.lock_state()
            .registry
            .get(&handle)
            .cloned()
            .ok_or_else(|| ResourceError::UnknownHandle { handle }.into())
    }

    /// Original image bytes of an item
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::NotFound`] if the item is not in the store.
    pub fn preview(&self, id: ItemId) -> Result<Resource> {
        let state = self.lock_state();
        let item = state.store.get(id).ok_or(ItemError::NotFound { id })?;
        let handle = item.preview;
        state
            .registry
            .get(&handle)
            .cloned()
            .ok_or_else(|| ResourceError::UnknownHandle { handle }.into())
    }

    /// Processed image bytes of a `Done` item
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::NotFound`] if the item is not in the store and
    /// [`ItemError::NoResult`] while it is loading or failed.
    pub fn result(&self, id: ItemId) -> Result<Resource> {
        let state = self.lock_state();
        let item = state.store.get(id).ok_or(ItemError::NotFound { id })?;
        let handle = match &item.state {
            ItemState::Done { result } => *result,
            other => {
                return Err(ItemError::NoResult {
                    id,
                    status: other.status(),
                }
                .into());
            }
        };
        state
            .registry
            .get(&handle)
            .cloned()
            .ok_or_else(|| ResourceError::UnknownHandle { handle }.into())
    }

    /// Number of live handles across both categories
    pub fn live_handles(&self) -> usize {
        self.lock_state().registry.len()
    }

    /// Number of live handles of one category
    pub fn live_handles_of(&self, kind: ResourceKind) -> usize {
        self.lock_state().registry.live_count(kind)
    }
}
