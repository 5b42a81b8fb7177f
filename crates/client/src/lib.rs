//! Client code for hubsearch.
//!
//! This crate provides the HTTP fetcher backing the resource cache and the
//! GitHub repository search client, shared by the CLI.

pub mod fetch;
pub mod github;

pub use fetch::{FetchConfig, HttpFetchClient, canonicalize};
pub use github::{GitHubClient, GitHubConfig, GitHubError, SearchRequest};
