//! Resource handle registry
//!
//! Every binary resource shown to presentation collaborators (original image
//! previews and processed results) is registered here and referenced through
//! an opaque [`ResourceHandle`]. The registry owns the bytes; releasing a
//! handle drops them. Handles come from a single monotonic counter, so a
//! handle value is never reused within a registry.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::{ResourceError, Result};

/// Category of a registered resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Original image as submitted
    Preview,
    /// Image returned by the processing backend
    Processed,
}

impl ResourceKind {
    fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Preview => "preview",
            ResourceKind::Processed => "processed",
        }
    }
}

/// Opaque reference to a registered resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ResourceHandle {
    /// Resource category
    pub kind: ResourceKind,
    /// Registry-unique sequence number
    pub seq: u64,
}

impl ResourceHandle {
    /// Build a handle from its parts
    pub fn new(kind: ResourceKind, seq: u64) -> Self {
        Self { kind, seq }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.seq)
    }
}

/// Bytes held alive by a registered handle
#[derive(Clone, Debug)]
pub struct Resource {
    /// Resource contents
    pub bytes: Bytes,
    /// MIME type, when known
    pub content_type: Option<String>,
}

/// Registry of live resource handles
#[derive(Debug, Default)]
pub struct HandleRegistry {
    next_seq: u64,
    live: HashMap<ResourceHandle, Resource>,
}

impl HandleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return the handle that now owns them
    pub fn acquire(
        &mut self,
        kind: ResourceKind,
        bytes: Bytes,
        content_type: Option<String>,
    ) -> ResourceHandle {
        self.next_seq += 1;
        let handle = ResourceHandle::new(kind, self.next_seq);
        self.live.insert(
            handle,
            Resource {
                bytes,
                content_type,
            },
        );
        tracing::trace!(%handle, live = self.live.len(), "handle acquired");
        handle
    }

    /// Release a handle and drop its bytes
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownHandle`] if the handle was never
    /// acquired here or has already been released.
    pub fn release(&mut self, handle: ResourceHandle) -> Result<()> {
        match self.live.remove(&handle) {
            Some(_) => {
                tracing::trace!(%handle, live = self.live.len(), "handle released");
                Ok(())
            }
            None => Err(ResourceError::UnknownHandle { handle }.into()),
        }
    }

    /// Release every live handle of every category
    ///
    /// Returns how many handles were released.
    pub fn release_all(&mut self) -> usize {
        let released = self.live.len();
        self.live.clear();
        released
    }

    /// Look up the resource behind a live handle
    pub fn get(&self, handle: &ResourceHandle) -> Option<&Resource> {
        self.live.get(handle)
    }

    /// Whether the handle is currently registered
    pub fn contains(&self, handle: &ResourceHandle) -> bool {
        self.live.contains_key(handle)
    }

    /// Number of live handles of one category
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.live.keys().filter(|h| h.kind == kind).count()
    }

    /// Total number of live handles
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no handle is live
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
