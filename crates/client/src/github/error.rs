//! GitHub API client error types.

use std::sync::Arc;

use hubsearch_core::Error;

/// Errors from the GitHub search client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GitHubError {
    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid page or page-size parameter.
    #[error("invalid pagination: {0}")]
    InvalidPage(String),

    /// Invalid base URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Authentication failed (bad or expired token).
    #[error("authentication failed: status {status}")]
    AuthError { status: u16 },

    /// Rate limited by the API.
    #[error("rate limited: status {status}")]
    RateLimited { status: u16 },

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GitHubError::Timeout } else { GitHubError::Network(Arc::new(err)) }
    }
}

impl From<GitHubError> for Error {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::InvalidQuery(_) | GitHubError::InvalidPage(_) => Error::InvalidInput(err.to_string()),
            GitHubError::InvalidBaseUrl(msg) => Error::InvalidUrl(msg),
            GitHubError::AuthError { status } | GitHubError::HttpError { status } => Error::HttpStatus { status },
            GitHubError::RateLimited { .. } => Error::RateLimited(err.to_string()),
            GitHubError::Timeout | GitHubError::Network(_) => Error::Transport(err.to_string()),
            GitHubError::Parse(msg) => Error::Decode(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitHubError::InvalidQuery("empty".to_string());
        assert!(err.to_string().contains("invalid query"));

        let err = GitHubError::RateLimited { status: 403 };
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_into_core_error() {
        assert_eq!(Error::from(GitHubError::HttpError { status: 500 }), Error::HttpStatus { status: 500 });
        assert_eq!(Error::from(GitHubError::AuthError { status: 401 }), Error::HttpStatus { status: 401 });
        assert!(matches!(Error::from(GitHubError::Parse("eof".into())), Error::Decode(_)));
        assert!(matches!(Error::from(GitHubError::Timeout), Error::Transport(_)));
        assert!(matches!(Error::from(GitHubError::RateLimited { status: 429 }), Error::RateLimited(_)));
        assert!(matches!(
            Error::from(GitHubError::InvalidQuery("x".into())),
            Error::InvalidInput(_)
        ));
    }
}
