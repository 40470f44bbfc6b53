//! Name sanitization, content-type extensions, and existing-file probing.
//!
//! Every on-disk name produced by this crate goes through [`sanitize_name`],
//! so document names can never escape the output directory or produce
//! invalid filenames on common filesystems.

use std::path::{Path, PathBuf};

/// Maximum length (in characters) of a sanitized name segment.
pub const MAX_NAME_CHARS: usize = 100;

/// Name used when sanitization leaves nothing behind.
pub const UNTITLED: &str = "untitled";

/// Number of leading image-ref characters appended to a base filename.
pub const REF_SUFFIX_CHARS: usize = 8;

/// Extension used when the content type is absent or unknown.
pub const DEFAULT_EXTENSION: &str = ".png";

/// Known image extensions, in probe order.
pub const KNOWN_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".gif", ".svg", ".webp"];

/// Sanitizes a document name for use as a path segment.
///
/// Replaces `/ \ : * ? " < > |`, whitespace and control characters with `_`,
/// collapses repeated separators, trims leading/trailing `_` and `.`, and
/// caps the result at [`MAX_NAME_CHARS`] characters. Returns [`UNTITLED`]
/// when nothing usable remains.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_sep = false;
    for ch in name.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
            }
            prev_sep = true;
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }

    let trimmed = out.trim_matches(|c: char| c == '_' || c == '.');
    let capped: String = trimmed.chars().take(MAX_NAME_CHARS).collect();
    // Truncation can expose a trailing separator again.
    let capped = capped.trim_end_matches(|c: char| c == '_' || c == '.');

    if capped.is_empty() {
        UNTITLED.to_string()
    } else {
        capped.to_string()
    }
}

/// Builds the extensionless filename for an image at one tree location.
///
/// `sanitize(declared_name) + "_" + first 8 chars of image_ref`.
#[must_use]
pub fn base_filename(declared_name: &str, image_ref: &str) -> String {
    let suffix: String = image_ref.chars().take(REF_SUFFIX_CHARS).collect();
    format!("{}_{suffix}", sanitize_name(declared_name))
}

/// Maps a Content-Type header value to a file extension.
///
/// Parameters after `;` are ignored and matching is case-insensitive.
/// Unknown types fall back to [`DEFAULT_EXTENSION`].
#[must_use]
pub fn extension_from_content_type(content_type: Option<&str>) -> &'static str {
    let Some(content_type) = content_type else {
        return DEFAULT_EXTENSION;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/gif" => ".gif",
        "image/svg+xml" => ".svg",
        "image/webp" => ".webp",
        _ => DEFAULT_EXTENSION,
    }
}

/// Appends `extension` to `path` without treating any existing dot as an extension.
#[must_use]
pub fn with_extension_appended(path: &Path, extension: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(extension);
    PathBuf::from(raw)
}

/// Looks for an already downloaded image at `path_without_extension`.
///
/// Tries every entry of [`KNOWN_EXTENSIONS`] in order and returns the first
/// path that is a regular file. Never creates or modifies anything.
pub async fn probe_existing(path_without_extension: &Path) -> Option<PathBuf> {
    for extension in KNOWN_EXTENSIONS {
        let candidate = with_extension_appended(path_without_extension, extension);
        if tokio::fs::metadata(&candidate)
            .await
            .is_ok_and(|meta| meta.is_file())
        {
            return Some(candidate);
        }
    }
    None
}
