//! Field filtering for collection queries
//!
//! AND semantics over every supplied `(key, value)` pair, exact string
//! match only. Keys a collection does not recognise are ignored rather
//! than treated as a non-match.

use std::collections::BTreeMap;

use serde_json::Value;

/// Filter map: key -> expected value
pub type Filter = BTreeMap<String, String>;

/// Per-kind hooks the query engine needs from a record
pub trait Queryable {
    /// Evaluates one filter pair.
    ///
    /// Returns `None` when `key` is not a filter this kind understands.
    fn filter_field(&self, key: &str, expected: &str) -> Option<bool>;

    /// Text fields searched by substring search
    fn search_fields(&self) -> Vec<&str>;

    /// Value used when sorting by `field`, or `None` for unsupported fields
    fn sort_value(&self, field: &str) -> Option<Value>;

    /// Copy safe to hand out of the store
    fn redacted(&self) -> Self
    where
        Self: Sized;
}

/// Evaluates filters against records
pub struct FieldFilter;

impl FieldFilter {
    /// Checks if a record matches all filter pairs
    pub fn matches<T: Queryable>(record: &T, filter: &Filter) -> bool {
        filter
            .iter()
            .all(|(key, expected)| record.filter_field(key, expected).unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Role, User};

    fn filter(pairs: &[(&str, &str)]) -> Filter {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_item_category_and_tag() {
        let item = Item::new("Lamp", "", 5.0, "u1")
            .with_category("c1")
            .with_tags(["t1", "t2"]);

        assert!(FieldFilter::matches(&item, &filter(&[("category_id", "c1")])));
        assert!(FieldFilter::matches(&item, &filter(&[("tag", "t2")])));
        assert!(FieldFilter::matches(
            &item,
            &filter(&[("category_id", "c1"), ("tag", "t1")])
        ));
        assert!(!FieldFilter::matches(
            &item,
            &filter(&[("category_id", "c1"), ("tag", "t9")])
        ));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let user = User::new("bob", "x", "bob@example.com", Role::User);
        assert!(FieldFilter::matches(&user, &filter(&[("colour", "red")])));
        assert!(FieldFilter::matches(
            &user,
            &filter(&[("colour", "red"), ("role", "user")])
        ));
        assert!(!FieldFilter::matches(&user, &filter(&[("role", "admin")])));
    }

    #[test]
    fn test_empty_filter_matches() {
        let item = Item::new("Lamp", "", 5.0, "u1");
        assert!(FieldFilter::matches(&item, &Filter::new()));
    }
}
