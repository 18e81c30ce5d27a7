//! Selection of the single item shown as "active".

use crate::types::ItemId;

/// Tracks which item is currently selected for display
///
/// The controller never looks at the store on its own. The manager feeds it
/// the ordered id list after each store mutation through
/// [`on_store_changed`](Self::on_store_changed), which repairs a missing or
/// dangling selection by falling back to the most recently added item.
#[derive(Debug, Default)]
pub struct SelectionController {
    current: Option<ItemId>,
}

impl SelectionController {
    /// Create a controller with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected id
    pub fn current(&self) -> Option<ItemId> {
        self.current
    }

    /// Select `id` without checking that it exists
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, id: ItemId) -> bool {
        let changed = self.current != Some(id);
        self.current = Some(id);
        changed
    }

    /// Repair the selection against the store's ids, oldest first
    ///
    /// Returns whether the selection changed.
    pub fn on_store_changed(&mut self, ids: &[ItemId]) -> bool {
        let still_present = self.current.is_some_and(|id| ids.contains(&id));
        if still_present {
            return false;
        }

        let fallback = ids.last().copied();
        let changed = self.current != fallback;
        self.current = fallback;
        changed
    }

    /// Drop the selection
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }
}
