//! Repository search result entity.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::ResourceKey;

/// A repository returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner_name: String,
    pub avatar_url: String,
    pub description: Option<String>,
    pub html_url: String,
    pub star_count: u64,
    pub language: Option<String>,
}

impl Repository {
    /// Cache key of the owner's avatar image.
    pub fn avatar_key(&self) -> Result<ResourceKey, Error> {
        ResourceKey::parse(&self.avatar_url)
    }
}
