//! Request Path Sanitization and Content Classification
//!
//! Incoming request paths are rewritten to safe, relative filenames before
//! they reach the cache: escape and parent-directory sequences are collapsed
//! to fixpoint, the path is made relative, and directory requests resolve to
//! their `index.html`.

use std::path::Path;

/// Normalize a raw request path into a relative filename.
///
/// Rewrites `\/` to `/`, drops `/../` segments, and collapses runs of `/`,
/// repeating until the string stops changing (a single pass can uncover new
/// occurrences). A leading `/` gains a `.` prefix; a trailing `/` resolves
/// to `index.html`.
pub fn normalize(raw: &str) -> String {
    let mut filename = raw.to_string();
    loop {
        let pass = filename
            .replace("\\/", "/")
            .replace("/../", "/")
            .replace("//", "/");
        if pass == filename {
            break;
        }
        filename = pass;
    }

    if filename.starts_with('/') {
        filename.insert(0, '.');
    }
    if filename.ends_with('/') {
        filename.push_str("index.html");
    }
    filename
}

/// Classify a filename's content type by extension
pub fn content_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Tests
// =============================================================================
