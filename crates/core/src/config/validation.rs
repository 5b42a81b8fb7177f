//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Largest page size the search API accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `page_size` is outside 1..=100
    /// - `image_cache_capacity` or `recent_search_limit` is 0
    /// - `max_image_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `api_base_url` is not an absolute URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid { field: "page_size".into(), reason: "must be between 1 and 100".into() });
        }

        if self.image_cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "image_cache_capacity".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.recent_search_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "recent_search_limit".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.max_image_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_image_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_image_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_image_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Err(e) = url::Url::parse(&self.api_base_url) {
            return Err(ConfigError::Invalid { field: "api_base_url".into(), reason: e.to_string() });
        }

        if self.prefetch_threshold >= self.page_size as usize {
            tracing::warn!(
                prefetch_threshold = self.prefetch_threshold,
                page_size = self.page_size,
                "prefetch_threshold is not smaller than page_size; \
                 every page will request the next one as soon as it is shown"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_page_size_zero() {
        let config = AppConfig { page_size: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "page_size"));
    }

    #[test]
    fn test_validate_page_size_exceeds_limit() {
        let config = AppConfig { page_size: 101, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "page_size"));
    }

    #[test]
    fn test_validate_zero_cache_capacity() {
        let config = AppConfig { image_cache_capacity: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "image_cache_capacity"));
    }

    #[test]
    fn test_validate_zero_recent_limit() {
        let config = AppConfig { recent_search_limit: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "recent_search_limit"));
    }

    #[test]
    fn test_validate_max_image_bytes() {
        let config = AppConfig { max_image_bytes: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_image_bytes"));

        let config = AppConfig { max_image_bytes: 51 * 1024 * 1024, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "max_image_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = AppConfig { api_base_url: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "api_base_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { page_size: 1, prefetch_threshold: 0, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { page_size: 100, timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
