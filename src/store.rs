//! Ordered store of submitted items.
//!
//! Items are kept in submission order, which doubles as recency order for
//! selection fallback. Terminal transitions arrive from processing tasks at
//! arbitrary times, possibly after the user removed the item; such late
//! transitions are discarded and hand their payload back so the caller can
//! release it.

use chrono::Utc;

use crate::registry::ResourceHandle;
use crate::types::{Item, ItemId, ItemInfo, ItemState, SourceMeta};

/// Why a terminal transition was not applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// The item was removed before the task finished
    ItemAbsent,
    /// The item already reached `Done` or `Error`
    AlreadyTerminal,
}

/// Outcome of a terminal transition
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum Transition<T> {
    /// The item now holds the payload
    Applied,
    /// The payload was not attached and is returned to the caller
    Discarded {
        /// Why the transition was dropped
        reason: DiscardReason,
        /// The payload the caller offered
        returned: T,
    },
}

/// Handles owned by an item at the time it was removed
#[must_use]
#[derive(Debug, Clone)]
pub struct RemovedItem {
    /// Snapshot of the item just before removal
    pub info: ItemInfo,
    /// Preview handle to release
    pub preview: ResourceHandle,
    /// Result handle to release, if the item was `Done`
    pub result: Option<ResourceHandle>,
}

impl RemovedItem {
    fn from_item(item: Item) -> Self {
        let info = item.info();
        let result = match item.state {
            ItemState::Done { result } => Some(result),
            ItemState::Loading | ItemState::Error { .. } => None,
        };
        Self {
            info,
            preview: item.preview,
            result,
        }
    }

    /// Every handle the removed item owned
    pub fn handles(&self) -> impl Iterator<Item = ResourceHandle> {
        std::iter::once(self.preview).chain(self.result)
    }
}

/// Ordered collection of items
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    next_id: u64,
}

impl ItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new `Loading` item owning `preview`
    pub fn create_item(&mut self, meta: SourceMeta, preview: ResourceHandle) -> ItemId {
        self.next_id += 1;
        let id = ItemId(self.next_id);
        self.items.push(Item {
            id,
            meta,
            preview,
            state: ItemState::Loading,
            created_at: Utc::now(),
        });
        id
    }

    /// Mark the item `Done` and attach its result
    ///
    /// If the item is gone (or already terminal) nothing changes and the
    /// handle comes back in [`Transition::Discarded`].
    pub fn transition_to_done(
        &mut self,
        id: ItemId,
        result: ResourceHandle,
    ) -> Transition<ResourceHandle> {
        self.transition(id, result, |result| ItemState::Done { result })
    }

    /// Mark the item `Error` with `message`; same absent-item rule as
    /// [`transition_to_done`](Self::transition_to_done)
    pub fn transition_to_error(&mut self, id: ItemId, message: String) -> Transition<String> {
        self.transition(id, message, |message| ItemState::Error { message })
    }

    fn transition<T>(
        &mut self,
        id: ItemId,
        payload: T,
        into_state: impl FnOnce(T) -> ItemState,
    ) -> Transition<T> {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Transition::Discarded {
                reason: DiscardReason::ItemAbsent,
                returned: payload,
            };
        };

        if item.state.is_terminal() {
            return Transition::Discarded {
                reason: DiscardReason::AlreadyTerminal,
                returned: payload,
            };
        }

        item.state = into_state(payload);
        Transition::Applied
    }

    /// Remove the item, returning the handles it owned
    pub fn remove(&mut self, id: ItemId) -> Option<RemovedItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(RemovedItem::from_item(self.items.remove(index)))
    }

    /// Remove every item, oldest first
    pub fn drain(&mut self) -> Vec<RemovedItem> {
        self.items.drain(..).map(RemovedItem::from_item).collect()
    }

    /// Snapshot of all items in submission order
    pub fn all(&self) -> Vec<ItemInfo> {
        self.items.iter().map(Item::info).collect()
    }

    /// Ids of all items in submission order
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Id of the most recently appended item still present
    pub fn last_id(&self) -> Option<ItemId> {
        self.items.last().map(|item| item.id)
    }

    /// Look up an item
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether an item with this id is present
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
