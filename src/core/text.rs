use std::collections::BTreeSet;

/// Canonicalize free text for comparison.
///
/// Lower-cases, turns underscores and hyphens into spaces, collapses
/// whitespace runs to a single space, and trims the ends, so that
/// "real_estate", "real-estate" and "Real Estate" all compare equal.
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `normalize` over an optional field; absent input normalizes to `""`.
#[inline]
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Normalized word set of a text, for overlap checks between free-text
/// fields. Ordered so iteration is deterministic.
pub fn token_set(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
