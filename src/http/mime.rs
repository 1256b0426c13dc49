//! Content-Type lookup by file extension.

use std::path::Path;

use crate::http::response::DEFAULT_CONTENT_TYPE;

/// Maps a file extension (without the dot, any case) to a Content-Type.
///
/// Unknown or missing extensions fall back to `text/plain`.
///
/// ```
/// use restatic::http::mime::content_type_for_extension;
/// assert_eq!(content_type_for_extension(Some("html")), "text/html");
/// assert_eq!(content_type_for_extension(Some("PNG")), "image/png");
/// assert_eq!(content_type_for_extension(None), "text/plain");
/// ```
pub fn content_type_for_extension(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return DEFAULT_CONTENT_TYPE;
    };

    match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Audio / video
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",

        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Content-Type for a path, from its extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    content_type_for_extension(path.extension().and_then(|e| e.to_str()))
}
