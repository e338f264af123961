//! Bounded previews for diagnostic rendering.
//!
//! Every helper here touches at most a small prefix of its input, so the cost
//! and output size stay constant regardless of payload size.

/// Maximum characters kept in a preview before "..." is appended.
pub const PREVIEW_CHARS: usize = 20;

/// Maximum number of batch items rendered.
pub const PREVIEW_ITEMS: usize = 5;

/// Maximum characters kept when rendering an error cause.
pub const ERROR_PREVIEW_CHARS: usize = 120;

const ELLIPSIS: &str = "...";

/// Truncates `text` to `PREVIEW_CHARS` characters.
pub fn truncate(text: &str) -> String {
    truncate_to(text, PREVIEW_CHARS)
}

/// Truncates `text` to `max_chars` characters, appending "..." when cut.
pub fn truncate_to(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let mut out = String::with_capacity(idx + ELLIPSIS.len());
            out.push_str(&text[..idx]);
            out.push_str(ELLIPSIS);
            out
        }
        None => text.to_owned(),
    }
}

/// Renders a UTF-8 (lossy) preview of `bytes`.
pub fn preview_text(bytes: &[u8]) -> String {
    // A char is at most 4 bytes, so this prefix always holds enough chars.
    let limit = bytes.len().min(PREVIEW_CHARS * 4);
    let head = String::from_utf8_lossy(&bytes[..limit]);
    let mut out = truncate(&head);
    if limit < bytes.len() && !out.ends_with(ELLIPSIS) {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Renders a base-16 preview of `bytes`.
pub fn preview_bytes(bytes: &[u8]) -> String {
    // Two hex digits per byte.
    let limit = bytes.len().min(PREVIEW_CHARS / 2 + 1);
    let encoded = hex::encode(&bytes[..limit]);
    let mut out = truncate(&encoded);
    if limit < bytes.len() && !out.ends_with(ELLIPSIS) {
        out.push_str(ELLIPSIS);
    }
    out
}
