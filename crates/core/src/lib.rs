//! Core types and shared functionality for hubsearch.
//!
//! This crate provides:
//! - Bounded resource cache with in-flight request coalescing
//! - Paginated search controller
//! - Recent search history
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod recent;
pub mod search;

pub use cache::{CacheStats, Decode, FetchClient, Image, ImageDecoder, ResourceCache, ResourceKey};
pub use config::{AppConfig, ConfigError};
pub use error::{Error, ErrorKind};
pub use recent::{MemoryRecentStore, RecentSearch, RecentSearchStore, RecentSearches};
pub use search::{
    PaginatedSearchController, PaginationConfig, PaginationError, Repository, SearchClient, SearchPage, SearchState,
};
