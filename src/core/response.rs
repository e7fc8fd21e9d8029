//! Transcript preview utilities
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Extracted preview truncation from the pipeline

/// Maximum number of characters shown inline in the completion message
pub const PREVIEW_LIMIT: usize = 500;

/// Marker appended when the transcript exceeds [`PREVIEW_LIMIT`]
pub const PREVIEW_MARKER: &str = "...";

/// Truncate a transcript for the inline preview
///
/// Counts characters, not bytes, so multi-byte text is never split
/// mid-character. A transcript of exactly [`PREVIEW_LIMIT`] characters is
/// returned verbatim with no marker; anything longer is cut to the limit
/// and the marker is appended.
pub fn transcript_preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_LIMIT) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], PREVIEW_MARKER),
    }
}
