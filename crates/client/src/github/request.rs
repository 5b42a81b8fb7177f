//! Repository search request types and validation.

use serde::Serialize;

use super::GitHubError;

/// Maximum query length accepted by the search endpoint.
pub const MAX_QUERY_CHARS: usize = 256;

/// Maximum `per_page` value.
pub const MAX_PER_PAGE: u32 = 100;

/// The search API never serves results beyond this position.
pub const MAX_REACHABLE_RESULTS: u64 = 1000;

/// Query parameters for `GET /search/repositories`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search query (required).
    pub q: String,

    /// 1-based page number.
    pub page: u32,

    /// Results per page (1-100).
    pub per_page: u32,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self { q: q.into(), page, per_page }
    }

    /// Validate the search request parameters.
    pub fn validate(&self) -> Result<(), GitHubError> {
        if self.q.trim().is_empty() {
            return Err(GitHubError::InvalidQuery("query cannot be empty".to_string()));
        }

        let chars = self.q.chars().count();
        if chars > MAX_QUERY_CHARS {
            return Err(GitHubError::InvalidQuery(format!(
                "query too long: {} chars (max {})",
                chars, MAX_QUERY_CHARS
            )));
        }

        if self.page == 0 {
            return Err(GitHubError::InvalidPage("page starts at 1".to_string()));
        }

        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(GitHubError::InvalidPage(format!(
                "per_page must be 1-{}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }

        let first_result = u64::from(self.page - 1) * u64::from(self.per_page);
        if first_result >= MAX_REACHABLE_RESULTS {
            return Err(GitHubError::InvalidPage(format!(
                "page {} is beyond the first {} results",
                self.page, MAX_REACHABLE_RESULTS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        assert!(SearchRequest::new("tokio", 1, 30).validate().is_ok());
        assert!(SearchRequest::new("language:rust stars:>100", 34, 30).validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        assert!(matches!(SearchRequest::new("", 1, 30).validate(), Err(GitHubError::InvalidQuery(_))));
        assert!(matches!(SearchRequest::new("   ", 1, 30).validate(), Err(GitHubError::InvalidQuery(_))));
    }

    #[test]
    fn test_query_too_long() {
        let q = "a".repeat(MAX_QUERY_CHARS + 1);
        assert!(matches!(SearchRequest::new(q, 1, 30).validate(), Err(GitHubError::InvalidQuery(_))));
        let q = "a".repeat(MAX_QUERY_CHARS);
        assert!(SearchRequest::new(q, 1, 30).validate().is_ok());
    }

    #[test]
    fn test_page_bounds() {
        assert!(matches!(SearchRequest::new("x", 0, 30).validate(), Err(GitHubError::InvalidPage(_))));
        assert!(matches!(SearchRequest::new("x", 1, 0).validate(), Err(GitHubError::InvalidPage(_))));
        assert!(matches!(SearchRequest::new("x", 1, 101).validate(), Err(GitHubError::InvalidPage(_))));
    }

    #[test]
    fn test_result_window() {
        // 34 * 30 = 1020 covers result 1000; page 35 starts past it.
        assert!(SearchRequest::new("x", 34, 30).validate().is_ok());
        assert!(matches!(SearchRequest::new("x", 35, 30).validate(), Err(GitHubError::InvalidPage(_))));
        assert!(SearchRequest::new("x", 10, 100).validate().is_ok());
        assert!(SearchRequest::new("x", 11, 100).validate().is_err());
    }
}
