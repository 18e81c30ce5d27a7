//! Utility functions for MIME type handling and path inspection

use std::path::Path;

/// Prefix shared by every image MIME type
const IMAGE_PREFIX: &str = "image/";

/// Known image extensions and their MIME types
///
/// Lookup is case-insensitive on the extension.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
    ("heic", "image/heic"),
];

/// Non-image extensions we still recognize, so they are reported with a
/// declared type rather than none
const OTHER_EXTENSIONS: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("html", "text/html"),
    ("csv", "text/csv"),
];

/// Whether a declared MIME type names an image
///
/// The check is a case-insensitive `image/` prefix match, so parameters such
/// as `image/png; charset=binary` are accepted as well.
///
/// # Examples
///
/// ```
/// use imgbatch::utils::is_image_content_type;
///
/// assert!(is_image_content_type("image/png"));
/// assert!(is_image_content_type("IMAGE/JPEG"));
/// assert!(!is_image_content_type("text/plain"));
/// assert!(!is_image_content_type("image"));
/// ```
pub fn is_image_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim_start();
    content_type
        .get(..IMAGE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_PREFIX))
}

/// Guess a MIME type from a file extension
///
/// Returns `None` for unknown or missing extensions.
///
/// # Examples
///
/// ```
/// use imgbatch::utils::content_type_from_path;
/// use std::path::Path;
///
/// assert_eq!(content_type_from_path(Path::new("cat.PNG")), Some("image/png"));
/// assert_eq!(content_type_from_path(Path::new("notes.txt")), Some("text/plain"));
/// assert_eq!(content_type_from_path(Path::new("Makefile")), None);
/// ```
pub fn content_type_from_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;
    IMAGE_EXTENSIONS
        .iter()
        .chain(OTHER_EXTENSIONS)
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, content_type)| *content_type)
}

/// File name component of a path, falling back to the whole path
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
