//! Shared utility functions.

use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\- _]+").unwrap());

static SEPARATORS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_\-]+").unwrap());

/// Lowercase, hyphen-separated ASCII slug of `text`, at most `max_len` bytes.
///
/// Returns `None` when nothing slug-worthy remains.
pub fn slug(text: &str, max_len: usize) -> Option<String> {
    let cleaned = UNSAFE_CHARS_RE.replace_all(text, "");
    let joined = SEPARATORS_RE
        .replace_all(cleaned.trim(), "-")
        .to_lowercase();
    let mut slug = joined.trim_matches('-').to_string();
    slug.truncate(max_len);
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}
