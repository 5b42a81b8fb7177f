//! Paginated repository search.
//!
//! - [`SearchClient`] is the collaborator seam that fetches one page.
//! - [`PaginatedSearchController`] owns the fetch state machine: it issues the
//!   first page of a query, accumulates later pages, decides when to prefetch,
//!   drops duplicate requests, and rolls back failed page loads.

pub mod controller;
pub mod repository;
pub mod state;

pub use controller::PaginatedSearchController;
pub use repository::Repository;
pub use state::{PaginationError, SearchState};

use async_trait::async_trait;

use crate::Error;

/// Results requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Remaining-item count at which the next page is prefetched.
pub const DEFAULT_PREFETCH_THRESHOLD: usize = 5;

/// One page of results as delivered by a [`SearchClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    /// Computed by the client from the page it fetched; trusted verbatim.
    pub has_more: bool,
}

impl<T> SearchPage<T> {
    /// Build a page, deriving `has_more` from its position in the result set.
    pub fn new(items: Vec<T>, total_count: u64, page: u32, page_size: u32) -> Self {
        Self { items, total_count, has_more: has_more(page, page_size, total_count) }
    }
}

/// Whether results exist beyond `page` (1-based) at `page_size` per page.
pub fn has_more(page: u32, page_size: u32, total_count: u64) -> bool {
    u64::from(page) * u64::from(page_size) < total_count
}

/// Fetches one page of search results.
#[async_trait]
pub trait SearchClient: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchPage<Self::Item>, Error>;
}

/// Page size and prefetch policy for a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub page_size: u32,
    pub prefetch_threshold: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_more_boundary() {
        assert!(!has_more(1, 30, 25));
        assert!(has_more(1, 30, 100));
        assert!(!has_more(1, 30, 30));
        assert!(has_more(3, 30, 91));
        assert!(!has_more(4, 30, 91));
        assert!(!has_more(1, 30, 0));
    }

    #[test]
    fn test_page_new_derives_has_more() {
        let page = SearchPage::new(vec![1, 2, 3], 100, 1, 30);
        assert!(page.has_more);
        let page = SearchPage::new(vec![1, 2, 3], 25, 1, 30);
        assert!(!page.has_more);
    }

    #[test]
    fn test_pagination_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(config.page_size, 30);
        assert_eq!(config.prefetch_threshold, 5);
    }
}
