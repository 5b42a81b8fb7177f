//! HTTP fetch pipeline for cached resources.
//!
//! - Keys arrive canonical (see [`canonicalize`]): scheme defaulted to
//!   `https`, lowercase host, no fragment.
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable), enforced on `Content-Length` and on
//!   the body actually received.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::{Duration, Instant};

pub use hubsearch_core::cache::{UrlError, canonicalize};

use hubsearch_core::{Error, FetchClient, ResourceKey};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "hubsearch/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "hubsearch/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl FetchConfig {
    pub fn from_app(config: &hubsearch_core::AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_image_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// Plain GET fetcher backing the resource cache.
#[derive(Debug, Clone)]
pub struct HttpFetchClient {
    http: Client,
    config: FetchConfig,
}

impl HttpFetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn too_large(&self, len: usize) -> Error {
        Error::TooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes))
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch(&self, key: &ResourceKey) -> Result<Bytes, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(key.as_str())
            .header("Accept", "image/avif,image/webp,image/png,image/*;q=0.8,*/*;q=0.5")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len > self.config.max_bytes as u64
        {
            return Err(self.too_large(usize::try_from(len).unwrap_or(usize::MAX)));
        }

        let bytes = response.bytes().await.map_err(transport)?;
        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len()));
        }

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            key,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(bytes)
    }
}

fn transport(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Transport(format!("request timed out: {}", e))
    } else {
        Error::Transport(format!("network error: {}", e))
    }
}
