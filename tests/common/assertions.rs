//! Custom test assertions for integration tests

use imgbatch::{Event, ItemId, SubmissionManager};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast::Receiver;

/// Terminal outcome of one item as observed on the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// `ItemDone` was emitted
    Done,
    /// `ItemFailed` was emitted with this message
    Failed(String),
}

/// Collect terminal events until every id in `ids` has one
///
/// Panics if they do not all arrive within `timeout`.
pub async fn wait_for_terminals(
    events: &mut Receiver<Event>,
    ids: &[ItemId],
    timeout: Duration,
) -> HashMap<ItemId, Terminal> {
    let mut seen = HashMap::new();

    tokio::time::timeout(timeout, async {
        while ids.iter().any(|id| !seen.contains_key(id)) {
            match events.recv().await {
                Ok(Event::ItemDone { id, .. }) => {
                    seen.insert(id, Terminal::Done);
                }
                Ok(Event::ItemFailed { id, error }) => {
                    seen.insert(id, Terminal::Failed(error));
                }
                Ok(_) => {}
                Err(e) => panic!("event channel error: {e}"),
            }
        }
    })
    .await
    .expect("items did not reach a terminal state in time");

    seen
}

/// Assert that no handle outlives the items holding it
pub fn assert_no_leaked_handles(manager: &SubmissionManager) {
    let items = manager.items();
    let expected = items.len() + items.iter().filter(|i| i.result.is_some()).count();
    assert_eq!(
        manager.live_handles(),
        expected,
        "live handles do not match the items in the store"
    );
}
