use regex::Regex;
use std::sync::LazyLock;

use crate::tables::is_stopword;

static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[.,!?;:'"]+|[.,!?;:'"]+$"#).unwrap());

/// Normalize a raw query into keywords.
/// Lowercases, splits on whitespace, trims edge punctuation, then drops
/// stopwords and tokens shorter than two characters. Order and duplicates
/// are preserved. No stemming.
pub fn normalize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|t| EDGE_PUNCTUATION.replace_all(t, "").into_owned())
        .filter(|t| t.chars().count() >= 2 && !is_stopword(t))
        .collect()
}

/// First whitespace-delimited token of the lowercased, trimmed query.
/// Punctuation is left in place.
pub fn leading_token(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}
