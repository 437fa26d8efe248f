//! Page descriptors for paginated results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`PageDescriptor`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Pages are numbered from 1.
    #[error("current page must be at least 1")]
    ZeroPage,

    /// A page must hold at least one result.
    #[error("results per page must be greater than 0")]
    ZeroPageSize,
}

/// One page of a larger result set, plus the metadata needed to navigate it.
///
/// Built through [`PageDescriptor::new`], which derives `total_pages` and
/// `is_empty` from the totals so they can never disagree:
///
/// - `is_empty == (total_results == 0)`
/// - `total_pages == ceil(total_results / results_per_page)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor<T> {
    items: Vec<T>,
    current_page: u64,
    results_per_page: u64,
    total_results: u64,
    total_pages: u64,
    is_empty: bool,
}

impl<T> PageDescriptor<T> {
    /// Describe page `current_page` of a result set of `total_results` items.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if `current_page` or `results_per_page` is zero.
    pub fn new(
        items: Vec<T>,
        current_page: u64,
        results_per_page: u64,
        total_results: u64,
    ) -> Result<Self, PageError> {
        if current_page == 0 {
            return Err(PageError::ZeroPage);
        }
        if results_per_page == 0 {
            return Err(PageError::ZeroPageSize);
        }

        Ok(Self {
            items,
            current_page,
            results_per_page,
            total_results,
            total_pages: total_results.div_ceil(results_per_page),
            is_empty: total_results == 0,
        })
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the descriptor, keeping only the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// 1-based page number.
    #[must_use]
    pub const fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Page size.
    #[must_use]
    pub const fn results_per_page(&self) -> u64 {
        self.results_per_page
    }

    /// Size of the whole result set.
    #[must_use]
    pub const fn total_results(&self) -> u64 {
        self.total_results
    }

    /// Number of pages in the whole result set.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// `true` when the whole result set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_empty
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_total_pages() {
        let page = PageDescriptor::new(vec![1, 2, 3, 4, 5], 2, 10, 15).unwrap();
        assert_eq!(page.total_pages(), 2);
        assert!(!page.is_empty());

        let exact = PageDescriptor::new(Vec::<u8>::new(), 1, 10, 100).unwrap();
        assert_eq!(exact.total_pages(), 10);
    }

    #[test]
    fn test_empty_result_set() {
        let page = PageDescriptor::new(Vec::<u8>::new(), 1, 10, 0).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn test_rejects_zero_page() {
        assert_eq!(
            PageDescriptor::new(vec![1], 0, 10, 1).unwrap_err(),
            PageError::ZeroPage
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        assert_eq!(
            PageDescriptor::new(vec![1], 1, 0, 1).unwrap_err(),
            PageError::ZeroPageSize
        );
    }
}
