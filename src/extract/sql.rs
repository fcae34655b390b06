//! Pulls a generated query out of action-group output prose.

use std::sync::LazyLock;

use regex::Regex;

// The fragment runs from `SELECT` to the line break before a
// `Returned information` line, or to the final line break of the text.
static SQL_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(SELECT.*?)\n\s*(?:Returned information|\z)")
        .expect("sql fragment regex must compile")
});

/// Extract the query fragment from free text.
///
/// This is a textual heuristic over model output, not a SQL parser; the
/// fragment is returned trimmed and is not validated.
pub fn extract_sql_query(text: &str) -> Option<String> {
    let fragment = SQL_FRAGMENT_RE.captures(text)?.get(1)?.as_str().trim();
    (!fragment.is_empty()).then(|| fragment.to_string())
}
