//! Query execution over a collection snapshot
//!
//! # Execution order
//!
//! 1. Filter by the request's filter map
//! 2. Sort (if a sort field was given)
//! 3. Slice the requested page
//! 4. Redact what leaves the store

use super::filters::{FieldFilter, Queryable};
use super::pagination::{Page, PageRequest};
use super::search::SubstringSearch;
use super::sorter::RecordSorter;

/// Runs page queries and searches over records taken from the store
pub struct QueryExecutor;

impl QueryExecutor {
    /// Filters, sorts and paginates `records`
    pub fn execute<T: Queryable>(records: Vec<T>, request: &PageRequest) -> Page<T> {
        let mut matched: Vec<T> = records
            .into_iter()
            .filter(|record| FieldFilter::matches(record, &request.filter))
            .collect();

        if let Some(spec) = request.sort_spec() {
            RecordSorter::sort(&mut matched, &spec);
        }

        let mut page = Page::slice(matched, request.window());
        page.data = page.data.iter().map(Queryable::redacted).collect();
        page
    }

    /// Substring search across the kind's search fields
    pub fn search<'a, T, I>(records: I, needle: &str) -> Vec<T>
    where
        T: Queryable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        records
            .into_iter()
            .filter(|record| SubstringSearch::matches(*record, needle))
            .map(Queryable::redacted)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Role, User};

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("Lamp", "", 30.0, "u1").with_category("c1"),
            Item::new("Desk", "", 120.0, "u1").with_category("c2"),
            Item::new("Chair", "", 80.0, "u2").with_category("c1"),
            Item::new("Shelf", "", 60.0, "u2").with_category("c1"),
        ]
    }

    #[test]
    fn test_filter_sort_page() {
        let request = PageRequest::new(1, 2)
            .with_filter("category_id", "c1")
            .sorted_by("price", false);

        let page = QueryExecutor::execute(catalog(), &request);
        let names: Vec<_> = page.data.iter().map(|i| i.name.as_str()).collect();

        assert_eq!(names, ["Lamp", "Shelf"]);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_sort_applies_before_slicing() {
        let request = PageRequest::new(2, 2).sorted_by("price", true);
        let page = QueryExecutor::execute(catalog(), &request);
        let names: Vec<_> = page.data.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Shelf", "Lamp"]);
    }

    #[test]
    fn test_users_redacted() {
        let users = vec![User::new("alice", "digest", "a@example.com", Role::User)];
        let page = QueryExecutor::execute(users.clone(), &PageRequest::default());
        assert!(page.data[0].password_hash.is_empty());

        let found = QueryExecutor::search(&users, "ALI");
        assert_eq!(found.len(), 1);
        assert!(found[0].password_hash.is_empty());
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let items = catalog();
        assert!(QueryExecutor::search(&items, "sofa").is_empty());
    }
}
