//! Helpers for cleaning user-supplied names and for keeping full
//! filesystem paths out of tracing span attributes.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields. Reveals the file name without exposing the upload
/// directory layout.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Reduces an uploaded file name to its final path component.
///
/// Browsers normally send a bare name, but nothing stops a client from
/// sending `../../etc/passwd` or `C:\\temp\\x.pdf`. Both separators are
/// treated as directory breaks. Returns `None` when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return None;
    }
    Some(cleaned.to_string())
}
