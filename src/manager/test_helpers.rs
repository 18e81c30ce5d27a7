//! Shared test helpers for driving a SubmissionManager deterministically.

use crate::config::Config;
use crate::error::ProcessError;
use crate::manager::SubmissionManager;
use crate::processor::ImageProcessor;
use crate::registry::ResourceKind;
use crate::types::{ItemId, ItemStatus, ProcessedImage, SourceFile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

type Outcome = Result<ProcessedImage, ProcessError>;

/// Processor whose outcome per file name is released by the test
///
/// Files without a gate complete immediately with their own bytes echoed
/// back as `image/png`.
#[derive(Default)]
pub(crate) struct ScriptedProcessor {
    gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
    calls: AtomicUsize,
}

/// Sender half of a gated file
pub(crate) struct Gate(oneshot::Sender<Outcome>);

impl Gate {
    pub(crate) fn succeed(self, bytes: &'static [u8]) {
        let _ = self.0.send(Ok(ProcessedImage {
            bytes: bytes::Bytes::from_static(bytes),
            content_type: Some("image/png".into()),
        }));
    }

    pub(crate) fn fail(self, error: ProcessError) {
        let _ = self.0.send(Err(error));
    }
}

impl ScriptedProcessor {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold back the outcome for `name` until the returned gate is used
    pub(crate) fn gate(&self, name: &str) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(name.to_string(), rx);
        Gate(tx)
    }

    /// How many times `process` was called
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProcessor for ScriptedProcessor {
    async fn process(&self, file: &SourceFile) -> Result<ProcessedImage, ProcessError> {
        let gate = self.gates.lock().unwrap().remove(&file.name);
        self.calls.fetch_add(1, Ordering::SeqCst);

        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ProcessError::Transport("gate dropped".into()))),
            None => Ok(ProcessedImage {
                bytes: file.bytes.clone(),
                content_type: Some("image/png".into()),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Manager wired to `processor` with default configuration
pub(crate) fn create_test_manager(processor: Arc<ScriptedProcessor>) -> SubmissionManager {
    SubmissionManager::with_processor(Config::default(), processor).unwrap()
}

pub(crate) fn png(name: &str) -> SourceFile {
    SourceFile::new(name, Some("image/png"), format!("bytes-of-{name}").into_bytes())
}

pub(crate) fn text(name: &str) -> SourceFile {
    SourceFile::new(name, Some("text/plain"), b"hello".to_vec())
}

/// Poll until `condition` holds, failing the test after a few seconds
pub(crate) async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}

/// Wait until the item reaches `status`
pub(crate) async fn wait_for_status(manager: &SubmissionManager, id: ItemId, status: ItemStatus) {
    wait_until(|| manager.item(id).is_ok_and(|info| info.status == status)).await;
}

/// Check every structural invariant under a single lock acquisition
///
/// - each item's flat snapshot agrees with its status
/// - the selection is empty exactly when the store is, and otherwise present
/// - live previews match items, live results match `Done` items
pub(crate) fn assert_invariants(manager: &SubmissionManager) {
    let state = manager.lock_state();
    let items = state.store.all();

    for item in &items {
        match item.status {
            ItemStatus::Loading => assert!(item.result.is_none() && item.error.is_none()),
            ItemStatus::Done => assert!(item.result.is_some() && item.error.is_none()),
            ItemStatus::Error => assert!(item.result.is_none() && item.error.is_some()),
        }
        assert!(state.registry.contains(&item.preview), "preview of {} not live", item.id);
        if let Some(result) = item.result {
            assert!(state.registry.contains(&result), "result of {} not live", item.id);
        }
    }

    match state.selection.current() {
        None => assert!(items.is_empty(), "non-empty store without selection"),
        Some(id) => assert!(
            state.store.contains(id),
            "selection {id} does not exist in the store"
        ),
    }

    let done = items.iter().filter(|i| i.status == ItemStatus::Done).count();
    assert_eq!(state.registry.live_count(ResourceKind::Preview), items.len());
    assert_eq!(state.registry.live_count(ResourceKind::Processed), done);
}
