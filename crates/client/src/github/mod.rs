//! GitHub repository search client.
//!
//! ### Endpoint
//!
//! - **Endpoint**: `https://api.github.com/search/repositories?q=&page=&per_page=`
//! - **Authentication**: optional bearer token; anonymous requests are
//!   allowed at a lower rate limit.
//! - **Result window**: the API serves at most the first 1000 results of any
//!   query, so pagination stops there whatever `total_count` says.
//! - **Normalization**: items become [`Repository`] entities.

pub mod error;
pub mod request;
pub mod response;

pub use error::GitHubError;
pub use request::SearchRequest;
pub use response::SearchResponse;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use std::time::{Duration, Instant};
use url::Url;

use hubsearch_core::search::{Repository, SearchClient, SearchPage};
use hubsearch_core::{AppConfig, Error};

/// Default base URL for the GitHub REST API.
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent. The API rejects requests without one.
const DEFAULT_USER_AGENT: &str = "hubsearch/0.1";

const ACCEPT: &str = "application/vnd.github+json";

/// GitHub client configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Base URL (default: https://api.github.com).
    pub base_url: String,
    /// Optional personal access token.
    pub token: Option<String>,
    /// User-agent string (default: hubsearch/0.x).
    pub user_agent: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GitHubConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            token: config.github_token.clone().filter(|t| !t.trim().is_empty()),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
        }
    }
}

/// GitHub repository search client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: GitHubConfig,
    endpoint: Url,
}

impl GitHubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let endpoint = search_endpoint(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(GitHubError::from)?;

        Ok(Self { http, config, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch one page of repositories.
    pub async fn search_repositories(&self, req: &SearchRequest) -> Result<SearchPage<Repository>, GitHubError> {
        req.validate()?;

        let start = Instant::now();
        tracing::debug!("searching repositories: query={} page={}", req.q, req.page);

        let mut request = self
            .http
            .get(self.endpoint.clone())
            .header(header::ACCEPT, ACCEPT)
            .query(req);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let http_response = request.send().await?;
        check_status(http_response.status())?;

        let bytes = http_response.bytes().await?;
        let api_response: SearchResponse =
            serde_json::from_slice(&bytes).map_err(|e| GitHubError::Parse(e.to_string()))?;

        if api_response.incomplete_results {
            tracing::warn!("search for {} timed out upstream; results are incomplete", req.q);
        }

        let page = api_response.into_page(req.page, req.per_page);
        tracing::debug!(
            "search completed in {:?}, {} results (total {})",
            start.elapsed(),
            page.items.len(),
            page.total_count
        );

        Ok(page)
    }
}

#[async_trait]
impl SearchClient for GitHubClient {
    type Item = Repository;

    async fn search(&self, query: &str, page: u32, page_size: u32) -> Result<SearchPage<Repository>, Error> {
        let req = SearchRequest::new(query, page, page_size);
        Ok(self.search_repositories(&req).await?)
    }
}

fn search_endpoint(base_url: &str) -> Result<Url, GitHubError> {
    let base = Url::parse(base_url).map_err(|e| GitHubError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(GitHubError::InvalidBaseUrl(format!("unsupported scheme: {}", base.scheme())));
    }
    let path = format!("{}/search/repositories", base.path().trim_end_matches('/'));
    let mut endpoint = base;
    endpoint.set_path(&path);
    Ok(endpoint)
}

fn check_status(status: StatusCode) -> Result<(), GitHubError> {
    match status.as_u16() {
        401 => Err(GitHubError::AuthError { status: 401 }),
        code @ (403 | 429) => Err(GitHubError::RateLimited { status: code }),
        _ if status.is_client_error() || status.is_server_error() => {
            Err(GitHubError::HttpError { status: status.as_u16() })
        }
        _ => Ok(()),
    }
}
