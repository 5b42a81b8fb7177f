//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HUBSEARCH_*)
//! 2. TOML config file (if HUBSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::search::{DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_THRESHOLD, PaginationConfig};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HUBSEARCH_*)
/// 2. TOML config file (if HUBSEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the repository search API.
    ///
    /// Set via HUBSEARCH_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional API token, sent as a bearer token.
    ///
    /// Set via HUBSEARCH_GITHUB_TOKEN environment variable.
    #[serde(default)]
    pub github_token: Option<String>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via HUBSEARCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via HUBSEARCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes accepted for a single image download.
    ///
    /// Set via HUBSEARCH_MAX_IMAGE_BYTES environment variable.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Results requested per page.
    ///
    /// Set via HUBSEARCH_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Remaining-item count at which the next page is prefetched.
    ///
    /// Set via HUBSEARCH_PREFETCH_THRESHOLD environment variable.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,

    /// Maximum number of decoded images kept in memory.
    ///
    /// Set via HUBSEARCH_IMAGE_CACHE_CAPACITY environment variable.
    #[serde(default = "default_image_cache_capacity")]
    pub image_cache_capacity: usize,

    /// Maximum number of remembered recent searches.
    ///
    /// Set via HUBSEARCH_RECENT_SEARCH_LIMIT environment variable.
    #[serde(default = "default_recent_search_limit")]
    pub recent_search_limit: usize,
}

fn default_api_base_url() -> String {
    "https://api.github.com".into()
}

fn default_user_agent() -> String {
    "hubsearch/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_image_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_prefetch_threshold() -> usize {
    DEFAULT_PREFETCH_THRESHOLD
}

fn default_image_cache_capacity() -> usize {
    100
}

fn default_recent_search_limit() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            github_token: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_image_bytes: default_max_image_bytes(),
            page_size: default_page_size(),
            prefetch_threshold: default_prefetch_threshold(),
            image_cache_capacity: default_image_cache_capacity(),
            recent_search_limit: default_recent_search_limit(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pagination settings for the search controller.
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig { page_size: self.page_size, prefetch_threshold: self.prefetch_threshold }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HUBSEARCH_`
    /// 2. TOML file from `HUBSEARCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("HUBSEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("HUBSEARCH_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
