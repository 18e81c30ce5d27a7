//! Trait for image processing backends

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::types::{ProcessedImage, SourceFile};

/// A backend that turns one submitted image into a processed image
///
/// Implementations must be safe to call concurrently: the task runner
/// invokes `process` once per item, and many items can be in flight at
/// the same time.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use imgbatch::error::ProcessError;
/// use imgbatch::processor::ImageProcessor;
/// use imgbatch::types::{ProcessedImage, SourceFile};
///
/// /// Returns the original bytes untouched
/// struct Passthrough;
///
/// #[async_trait]
/// impl ImageProcessor for Passthrough {
///     async fn process(&self, file: &SourceFile) -> Result<ProcessedImage, ProcessError> {
///         Ok(ProcessedImage {
///             bytes: file.bytes.clone(),
///             content_type: file.content_type.clone(),
///         })
///     }
///
///     fn name(&self) -> &'static str {
///         "passthrough"
///     }
/// }
/// ```
#[async_trait]
pub trait ImageProcessor: Send + Sync {
    /// Send `file` to the backend and wait for its outcome
    async fn process(&self, file: &SourceFile) -> Result<ProcessedImage, ProcessError>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}
