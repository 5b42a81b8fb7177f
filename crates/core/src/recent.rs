//! Recent search history and autocomplete.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Default number of remembered queries.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// A query the user ran, with the time it was last run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearch {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

/// Storage for recent searches.
pub trait RecentSearchStore: Send + Sync {
    /// Entries, newest first.
    fn list(&self) -> Vec<RecentSearch>;

    /// Record `query`, moving an existing entry to the front.
    fn save(&self, query: &str);

    fn delete(&self, query: &str);

    fn clear(&self);
}

/// In-memory store bounded to `limit` entries.
#[derive(Debug)]
pub struct MemoryRecentStore {
    entries: Mutex<Vec<RecentSearch>>,
    limit: usize,
}

impl MemoryRecentStore {
    pub fn new(limit: usize) -> Self {
        Self { entries: Mutex::new(Vec::with_capacity(limit)), limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for MemoryRecentStore {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_LIMIT)
    }
}

impl RecentSearchStore for MemoryRecentStore {
    fn list(&self) -> Vec<RecentSearch> {
        let mut entries = self.entries.lock().clone();
        entries.sort_by(|a, b| b.searched_at.cmp(&a.searched_at));
        entries
    }

    fn save(&self, query: &str) {
        let mut entries = self.entries.lock();
        entries.retain(|entry| entry.query != query);
        entries.insert(0, RecentSearch { query: query.to_owned(), searched_at: Utc::now() });
        entries.truncate(self.limit);
    }

    fn delete(&self, query: &str) {
        self.entries.lock().retain(|entry| entry.query != query);
    }

    fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Query normalization and matching on top of a [`RecentSearchStore`].
#[derive(Debug, Default)]
pub struct RecentSearches<S> {
    store: S,
}

impl<S: RecentSearchStore> RecentSearches<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn recent(&self) -> Vec<RecentSearch> {
        self.store.list()
    }

    /// Remember `query`. Surrounding whitespace is dropped and blank queries
    /// are ignored. Returns whether anything was recorded.
    pub fn record(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        self.store.save(query);
        tracing::debug!(query, "recorded recent search");
        true
    }

    pub fn forget(&self, query: &str) {
        self.store.delete(query.trim());
    }

    pub fn forget_all(&self) {
        self.store.clear();
    }

    /// Recent searches containing `input`, ignoring case, newest first.
    /// Blank input matches nothing.
    pub fn suggestions(&self, input: &str) -> Vec<RecentSearch> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.store
            .list()
            .into_iter()
            .filter(|entry| entry.query.to_lowercase().contains(&needle))
            .collect()
    }
}
