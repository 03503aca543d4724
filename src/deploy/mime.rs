// src/deploy/mime.rs

use std::path::Path;

/// Content type for an uploaded file, by extension.
///
/// The upload form only accepts ZIP archives sent as `application/zip`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" => "text/plain",
        "zip" => "application/zip",
        "htm" | "html" => "text/html",
        "doc" => "application/msword",
        "png" => "image/png",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
