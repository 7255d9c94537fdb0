//! Small text helpers used by provider clients and the summarizer.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year regex"));

/// Collapse embedded newlines and runs of whitespace into single spaces.
///
/// Provider markup frequently wraps titles and abstracts across lines.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract a publication year from a free-text date such as
/// `"2023-01-15T10:00:00Z"` or `"2023 Mar 15"`.
///
/// Returns `None` when no four-digit year is present; callers must leave
/// the year absent rather than substitute a sentinel.
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Deterministic content hash of normalized input text.
///
/// Case and surrounding whitespace are ignored so that semantically
/// identical inputs memoize to the same summary record.
pub fn content_hash(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("Deep  Learning\n  for\tGraphs"),
            "Deep Learning for Graphs"
        );
        assert_eq!(collapse_whitespace("  already clean  "), "already clean");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2023-01-15T10:00:00Z"), Some(2023));
        assert_eq!(extract_year("2023 Mar 15"), Some(2023));
        assert_eq!(extract_year("published in 1998."), Some(1998));
        assert_eq!(extract_year("unknown"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_content_hash_normalizes() {
        let a = content_hash("Quantum Computing  ");
        let b = content_hash("  quantum computing");
        assert_eq!(a, b);
        assert_ne!(a, content_hash("quantum computers"));
        // sha256 hex digest
        assert_eq!(a.len(), 64);
    }
}
