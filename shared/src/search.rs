//! Search-as-you-type helpers.

use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Trimmed search term, or `None` when there is nothing to search for.
pub fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Case-insensitive substring match used by local filtering.
pub fn matches_query(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_clears_results() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   \t"), None);
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(normalize_query("  rust  "), Some("rust".to_string()));
    }

    #[test]
    fn test_matches_ignore_case() {
        assert!(matches_query("Intro to Rust", "rUST"));
        assert!(!matches_query("Intro to Rust", "python"));
    }
}
