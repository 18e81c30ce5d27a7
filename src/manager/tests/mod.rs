use super::test_helpers::*;
use super::*;
use crate::error::{
    Error, ItemError, PROCESSING_FAILED_MESSAGE, ProcessError, ResourceError,
    UPLOAD_FAILED_MESSAGE,
};
use crate::registry::ResourceKind;
use crate::types::{ItemStatus, RejectReason, SourceFile};
use tokio::sync::broadcast::error::TryRecvError;

mod control;

/// Drain every event already sent to `rx`
fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(n)) => panic!("test receiver lagged by {n}"),
        }
    }
}
