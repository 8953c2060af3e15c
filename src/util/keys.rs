use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static ISSUE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]+-[0-9]+\b").expect("issue key pattern is valid"));

/// Find issue keys like `ABC-123` anywhere in free text.
///
/// Keys are returned once each, in the order they first appear.
pub fn extract_issue_keys(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ISSUE_KEY
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|key| seen.insert(*key))
        .map(String::from)
        .collect()
}
