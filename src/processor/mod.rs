//! Processing backends
//!
//! The task runner talks to the image-processing service through the
//! [`ImageProcessor`] trait, so the HTTP transport can be swapped for an
//! in-process implementation (tests, embedded hosts).
//!
//! - [`HttpProcessor`]: POSTs the file as multipart form data to a configured endpoint

mod http;
mod traits;

pub use http::{FILE_FIELD, HttpProcessor};
pub use traits::ImageProcessor;
