//! Bounded in-memory resource cache with in-flight request coalescing.
//!
//! Concurrent `get` calls for the same key share one fetch. The fetch runs as
//! its own tokio task, so a caller that stops waiting never cancels it for
//! the others, and its outcome lands in the store even if nobody is left
//! waiting. Failures are handed to every waiter and then forgotten.

pub mod image;
pub mod key;

pub use image::{Image, ImageDecoder, ImageFormat};
pub use key::{ResourceKey, UrlError, canonicalize};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::Error;

/// Retrieves raw bytes for a resource key.
#[async_trait]
pub trait FetchClient: Send + Sync {
    async fn fetch(&self, key: &ResourceKey) -> Result<Bytes, Error>;
}

/// Turns fetched bytes into the cached resource type.
pub trait Decode: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    fn decode(&self, key: &ResourceKey, bytes: Bytes) -> Result<Self::Output, Error>;
}

type InFlight<R> = Shared<BoxFuture<'static, Result<Arc<R>, Error>>>;

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub in_flight: usize,
    pub hits: u64,
    /// Fetches actually started against the collaborator.
    pub fetches: u64,
    /// Requests that joined a fetch already in flight.
    pub coalesced: u64,
}

struct CacheState<R> {
    store: LruCache<ResourceKey, Arc<R>>,
    in_flight: HashMap<ResourceKey, InFlight<R>>,
    hits: u64,
    fetches: u64,
    coalesced: u64,
}

/// Keyed fetch-and-decode cache bounded by entry count.
pub struct ResourceCache<D: Decode> {
    state: Arc<Mutex<CacheState<D::Output>>>,
    fetcher: Arc<dyn FetchClient>,
    decoder: Arc<D>,
    capacity: NonZeroUsize,
}

impl<D: Decode> Clone for ResourceCache<D> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            fetcher: Arc::clone(&self.fetcher),
            decoder: Arc::clone(&self.decoder),
            capacity: self.capacity,
        }
    }
}

impl<D: Decode> ResourceCache<D> {
    /// Create a cache holding at most `capacity` decoded resources.
    ///
    /// A zero capacity is rejected as `InvalidInput`.
    pub fn new(fetcher: Arc<dyn FetchClient>, decoder: D, capacity: usize) -> Result<Self, Error> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::InvalidInput("cache capacity must be greater than 0".into()))?;

        let state = CacheState {
            store: LruCache::new(capacity),
            in_flight: HashMap::new(),
            hits: 0,
            fetches: 0,
            coalesced: 0,
        };

        Ok(Self { state: Arc::new(Mutex::new(state)), fetcher, decoder: Arc::new(decoder), capacity })
    }

    /// Return the resource for `key`, fetching it at most once across all
    /// concurrent callers.
    ///
    /// A cached resource is returned without suspending. Dropping the returned
    /// future only detaches this caller from the shared fetch.
    pub async fn get(&self, key: &ResourceKey) -> Result<Arc<D::Output>, Error> {
        let flight = {
            let mut state = self.state.lock();

            if let Some(hit) = state.store.get(key) {
                let hit = Arc::clone(hit);
                state.hits += 1;
                tracing::debug!(key = %key.fingerprint(), "resource cache hit");
                return Ok(hit);
            }

            if let Some(existing) = state.in_flight.get(key) {
                let existing = existing.clone();
                state.coalesced += 1;
                tracing::debug!(key = %key.fingerprint(), "joining in-flight fetch");
                existing
            } else {
                let flight = self.start_fetch(key.clone());
                state.in_flight.insert(key.clone(), flight.clone());
                state.fetches += 1;
                tracing::debug!(key = %key.fingerprint(), url = %key, "starting fetch");
                flight
            }
        };

        flight.await
    }

    /// Look up a cached resource without fetching.
    pub fn peek(&self, key: &ResourceKey) -> Option<Arc<D::Output>> {
        self.state.lock().store.peek(key).cloned()
    }

    /// Drop every cached entry. Fetches already in flight are left running
    /// and still store their result when they finish.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let dropped = state.store.len();
        state.store.clear();
        tracing::info!(dropped, "resource cache cleared");
    }

    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.store.len(),
            capacity: self.capacity.get(),
            in_flight: state.in_flight.len(),
            hits: state.hits,
            fetches: state.fetches,
            coalesced: state.coalesced,
        }
    }

    /// Spawn the fetch+decode task and wrap its handle in a shareable future.
    ///
    /// Must be called with the state lock held so that registration in the
    /// in-flight map is atomic with the miss check.
    fn start_fetch(&self, key: ResourceKey) -> InFlight<D::Output> {
        let state = Arc::clone(&self.state);
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = Arc::clone(&self.decoder);

        let handle = tokio::spawn(async move {
            let outcome = match fetcher.fetch(&key).await {
                Ok(bytes) => decoder.decode(&key, bytes).map(Arc::new),
                Err(e) => Err(e),
            };

            let mut state = state.lock();
            state.in_flight.remove(&key);
            match &outcome {
                Ok(resource) => {
                    if let Some((evicted, _)) = state.store.push(key.clone(), Arc::clone(resource))
                        && evicted != key
                    {
                        tracing::debug!(evicted = %evicted.fingerprint(), "evicted least recently used resource");
                    }
                }
                Err(e) => tracing::warn!(key = %key.fingerprint(), url = %key, error = %e, "fetch failed"),
            }
            outcome
        });

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Aborted(e.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}
