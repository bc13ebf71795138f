//! Text normalization shared by index construction and query resolution.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Normalize a name variant or user query for pattern matching.
///
/// Lowercases, trims, and collapses internal whitespace. The index builder
/// and the resolver must apply the same function so keys compare equal.
/// Idempotent: normalizing an already-normalized string is a no-op.
pub fn normalize(input: &str) -> String {
    WHITESPACE_RE.replace_all(input.trim(), " ").to_lowercase()
}

/// Remove markup-style tags from free text, leaving plain text.
///
/// Entities (`&amp;` etc.) pass through untouched. Runs until no tag
/// remains so nested fragments like `<a<b>>` cannot survive one pass,
/// which keeps the function idempotent. Never panics on unmatched or
/// malformed markup; a lone `<` or `>` is ordinary text.
pub fn strip_tags(input: &str) -> String {
    let mut text = input.to_string();
    loop {
        let stripped = TAG_RE.replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    SPACE_RUN_RE.replace_all(&text, " ").trim().to_string()
}
