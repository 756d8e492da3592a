//! Helpers shared by the response resolver and error messages.

/// Maximum number of characters of a response body quoted in error messages.
pub const BODY_SNIPPET_CHARS: usize = 500;

/// Truncate a string to at most `max_chars` characters, never splitting a
/// multi-byte character.
pub fn truncate_body(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
