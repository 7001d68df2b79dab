//! Page requests and page slicing
//!
//! `page` is 1-based; values <= 0 normalize to 1. `per_page` values <= 0
//! normalize to [`DEFAULT_PER_PAGE`]. A page past the end is empty, never
//! an error. `total_pages` is at least 1 even for an empty collection.

use serde::{Deserialize, Serialize};

use super::filters::Filter;
use super::sorter::{SortDirection, SortSpec};

/// Page size used when the caller supplies none
pub const DEFAULT_PER_PAGE: i64 = 25;

/// A caller's request for one page of a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_desc: bool,
    #[serde(default)]
    pub filter: Filter,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page,
            per_page,
            ..Default::default()
        }
    }

    /// Sort by `field`, descending if `desc`
    pub fn sorted_by(mut self, field: impl Into<String>, desc: bool) -> Self {
        self.sort_by = Some(field.into());
        self.sort_desc = desc;
        self
    }

    /// Add one filter pair
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.insert(key.into(), value.into());
        self
    }

    /// Sort specification, if a sort field was given
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_by.as_ref().map(|field| SortSpec {
            field: field.clone(),
            direction: if self.sort_desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        })
    }

    /// Normalized page window
    pub fn window(&self) -> PageWindow {
        PageWindow::normalize(self.page, self.per_page)
    }
}

/// Normalized `(page, per_page)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
}

impl PageWindow {
    pub fn normalize(page: i64, per_page: i64) -> Self {
        Self {
            page: if page <= 0 { 1 } else { page },
            per_page: if per_page <= 0 {
                DEFAULT_PER_PAGE
            } else {
                per_page
            },
        }
    }

    /// Half-open `[start, end)` range of this page within `total` records
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        let per_page = self.per_page as u64;
        let start = ((self.page - 1) as u64).saturating_mul(per_page);
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(total);
        let end = start
            .saturating_add(usize::try_from(per_page).unwrap_or(usize::MAX))
            .min(total);
        (start, end)
    }

    /// `ceil(total / per_page)`, at least 1
    pub fn total_pages(&self, total: usize) -> usize {
        let per_page = self.per_page as usize;
        total.div_ceil(per_page).max(1)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slices an already filtered and sorted result set
    pub fn slice(mut records: Vec<T>, window: PageWindow) -> Self {
        let total = records.len();
        let (start, end) = window.bounds(total);

        records.truncate(end);
        let data = records.split_off(start);

        Self {
            data,
            page: window.page,
            per_page: window.per_page,
            total_items: total,
            total_pages: window.total_pages(total),
        }
    }

    /// Returns true if the page holds no records
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(PageWindow::normalize(0, 0), PageWindow::normalize(1, 25));
        assert_eq!(PageWindow::normalize(-3, -1).page, 1);
        assert_eq!(PageWindow::normalize(-3, -1).per_page, DEFAULT_PER_PAGE);
        assert_eq!(PageWindow::normalize(4, 10).page, 4);
    }

    #[test]
    fn test_bounds_clamp_past_end() {
        let window = PageWindow::normalize(5, 10);
        assert_eq!(window.bounds(23), (23, 23));
        let window = PageWindow::normalize(3, 10);
        assert_eq!(window.bounds(23), (20, 23));
    }

    #[test]
    fn test_total_pages_minimum_one() {
        let window = PageWindow::normalize(1, 10);
        assert_eq!(window.total_pages(0), 1);
        assert_eq!(window.total_pages(10), 1);
        assert_eq!(window.total_pages(11), 2);
    }

    #[test]
    fn test_slice() {
        let page = Page::slice((0..7).collect::<Vec<_>>(), PageWindow::normalize(2, 3));
        assert_eq!(page.data, vec![3, 4, 5]);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.total_pages, 3);

        let past_end = Page::slice((0..7).collect::<Vec<_>>(), PageWindow::normalize(9, 3));
        assert!(past_end.is_empty());
        assert_eq!(past_end.page, 9);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let window = PageWindow::normalize(i64::MAX, i64::MAX);
        assert_eq!(window.bounds(5), (5, 5));
    }

    #[test]
    fn test_sort_spec() {
        let req = PageRequest::new(1, 10).sorted_by("price", true);
        assert_eq!(req.sort_spec(), Some(SortSpec::desc("price")));
        assert_eq!(PageRequest::default().sort_spec(), None);
    }
}
