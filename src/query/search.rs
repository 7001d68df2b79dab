//! Case-insensitive substring search
//!
//! A record matches if any of its search fields contains the needle.
//! No tokenization, no ranking.

use super::filters::Queryable;

/// Returns true if `haystack` contains `needle`, ignoring case
pub fn contains_insensitive(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Substring matcher over a kind's search fields
pub struct SubstringSearch;

impl SubstringSearch {
    /// Checks if any search field of `record` contains `needle`
    pub fn matches<T: Queryable>(record: &T, needle: &str) -> bool {
        record
            .search_fields()
            .into_iter()
            .any(|field| contains_insensitive(field, needle))
    }
}
