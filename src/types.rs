//! Core types for imgbatch

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::registry::ResourceHandle;

/// Unique identifier for a submitted item
///
/// Ids are handed out in increasing order by the item store and are never
/// reused, even after the item is removed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Get the inner u64 value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Flat item status as seen by presentation collaborators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Uploaded or uploading; no outcome yet
    Loading,
    /// Processed successfully, result available
    Done,
    /// Processing failed
    Error,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Loading => "loading",
            ItemStatus::Done => "done",
            ItemStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Lifecycle state of an item
///
/// A result only exists in `Done` and a message only in `Error`, so an item
/// can never carry both, nor a result while still loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemState {
    /// Waiting for the processing task to finish
    Loading,
    /// Terminal: processed image registered under `result`
    Done {
        /// Handle to the processed image
        result: ResourceHandle,
    },
    /// Terminal: processing failed
    Error {
        /// Human-readable failure message
        message: String,
    },
}

impl ItemState {
    /// Flat status of this state
    pub fn status(&self) -> ItemStatus {
        match self {
            ItemState::Loading => ItemStatus::Loading,
            ItemState::Done { .. } => ItemStatus::Done,
            ItemState::Error { .. } => ItemStatus::Error,
        }
    }

    /// Whether the item already received its terminal transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ItemState::Loading)
    }
}

/// Descriptive metadata captured when a file is submitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceMeta {
    /// Original file name
    pub name: String,
    /// Size of the original file in bytes
    pub size_bytes: u64,
    /// Declared MIME type of the original file
    pub content_type: String,
}

/// One submission tracked by the item store
#[derive(Clone, Debug)]
pub struct Item {
    /// Stable identifier
    pub id: ItemId,
    /// Metadata of the submitted file
    pub meta: SourceMeta,
    /// Handle to the original image bytes
    pub preview: ResourceHandle,
    /// Lifecycle state
    pub state: ItemState,
    /// When the item was created
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Read-only snapshot for presentation collaborators
    pub fn info(&self) -> ItemInfo {
        let (result, error) = match &self.state {
            ItemState::Loading => (None, None),
            ItemState::Done { result } => (Some(*result), None),
            ItemState::Error { message } => (None, Some(message.clone())),
        };

        ItemInfo {
            id: self.id,
            name: self.meta.name.clone(),
            size_bytes: self.meta.size_bytes,
            content_type: self.meta.content_type.clone(),
            status: self.state.status(),
            preview: self.preview,
            result,
            error,
            created_at: self.created_at,
        }
    }
}

/// Snapshot of an item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemInfo {
    /// Unique item identifier
    pub id: ItemId,

    /// Original file name
    pub name: String,

    /// Size of the original file in bytes
    pub size_bytes: u64,

    /// Declared MIME type of the original file
    pub content_type: String,

    /// Current status
    pub status: ItemStatus,

    /// Handle to the original image
    pub preview: ResourceHandle,

    /// Handle to the processed image (only when status is "done")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResourceHandle>,

    /// Failure message (only when status is "error")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the item was submitted
    pub created_at: DateTime<Utc>,
}

/// A raw file handed to [`SubmissionManager::add_files`](crate::SubmissionManager::add_files)
#[derive(Clone, Debug)]
pub struct SourceFile {
    /// File name as provided by the input surface
    pub name: String,
    /// Declared MIME type, if the input surface knows one
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Bytes,
}

impl SourceFile {
    /// Create a new source file
    pub fn new(
        name: impl Into<String>,
        content_type: Option<impl Into<String>>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(Into::into),
            bytes: bytes.into(),
        }
    }

    /// Whether the declared MIME type is an image type
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(crate::utils::is_image_content_type)
    }

    /// Size of the file in bytes
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Outcome of a successful processing round trip
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    /// Processed image bytes
    pub bytes: Bytes,
    /// Content type reported by the backend, if any
    pub content_type: Option<String>,
}

/// Why a file passed to `add_files` did not become an item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The declared MIME type is missing or not `image/*`
    NotAnImage,
}

/// A file that was filtered out by `add_files`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RejectedFile {
    /// File name as provided
    pub name: String,
    /// Declared MIME type, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Why it was rejected
    pub reason: RejectReason,
}

/// Result of an `add_files` call
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddFilesOutcome {
    /// Ids of the items created, in submission order
    pub accepted: Vec<ItemId>,
    /// Files that were not images, in input order
    pub rejected: Vec<RejectedFile>,
}

/// Current selection as exposed to presentation collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SelectionInfo {
    /// Selected item id (None when nothing is selected)
    pub id: Option<ItemId>,
    /// Snapshot of the selected item, when it is present in the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemInfo>,
}

/// Event emitted during the item lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Item created and its processing task dispatched
    ItemQueued {
        /// Item ID
        id: ItemId,
        /// Original file name
        name: String,
        /// Original size in bytes
        size_bytes: u64,
    },

    /// Processing finished and the result is registered
    ItemDone {
        /// Item ID
        id: ItemId,
        /// Handle to the processed image
        result: ResourceHandle,
    },

    /// Processing failed
    ItemFailed {
        /// Item ID
        id: ItemId,
        /// Message stored on the item
        error: String,
    },

    /// Item removed and its handles released
    ItemRemoved {
        /// Item ID
        id: ItemId,
    },

    /// The active item changed
    SelectionChanged {
        /// Newly selected item (None when the store became empty)
        id: Option<ItemId>,
    },

    /// Manager torn down; every handle released
    Teardown,
}
