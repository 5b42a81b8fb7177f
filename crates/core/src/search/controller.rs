//! Paginated search state machine.
//!
//! A session is one query's pagination lifecycle. At most one fetch is
//! outstanding per session; the busy flag is claimed under the session lock
//! before the fetch is issued and released when its result is applied.
//! Every fetch carries the generation of the session that issued it, and a
//! result whose generation no longer matches is discarded.

use futures_util::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use super::{PaginationConfig, PaginationError, SearchClient, SearchPage, SearchState};
use crate::Error;

/// Buffered pagination errors per subscriber before the oldest are dropped.
const PAGINATION_ERROR_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fetch {
    FirstPage,
    NextPage,
}

#[derive(Debug)]
struct Session<T> {
    generation: u64,
    query: String,
    items: Vec<T>,
    total_count: u64,
    current_page: u32,
    has_more: bool,
    outstanding: Option<Fetch>,
}

impl<T> Session<T> {
    fn new() -> Self {
        Self {
            generation: 0,
            query: String::new(),
            items: Vec::new(),
            total_count: 0,
            current_page: 1,
            has_more: false,
            outstanding: None,
        }
    }

    /// Replace the session with a fresh one for `query` and claim the first
    /// page fetch. Returns the new generation.
    fn restart(&mut self, query: &str) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.query = query.to_owned();
        self.items.clear();
        self.total_count = 0;
        self.current_page = 1;
        self.has_more = false;
        self.outstanding = Some(Fetch::FirstPage);
        self.generation
    }
}

struct Inner<C: SearchClient> {
    client: C,
    config: PaginationConfig,
    session: Mutex<Session<C::Item>>,
    state: watch::Sender<SearchState<C::Item>>,
    pagination_errors: broadcast::Sender<PaginationError>,
}

/// Drives a query-scoped, page-accumulating search.
///
/// Cloning is cheap and every clone drives the same session, so operations
/// may be invoked from several tasks. Fetches run on spawned tasks: dropping
/// the future returned by [`search`](Self::search) or
/// [`load_next_page`](Self::load_next_page) does not abandon the fetch, and
/// its result is still applied.
pub struct PaginatedSearchController<C: SearchClient> {
    inner: Arc<Inner<C>>,
}

impl<C: SearchClient> Clone for PaginatedSearchController<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: SearchClient> PaginatedSearchController<C> {
    pub fn new(client: C, config: PaginationConfig) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        let (pagination_errors, _) = broadcast::channel(PAGINATION_ERROR_CAPACITY);

        Self {
            inner: Arc::new(Inner { client, config, session: Mutex::new(Session::new()), state, pagination_errors }),
        }
    }

    /// Start a new session for `query` and fetch its first page.
    ///
    /// Dropped (returns `false`) while another first page is loading. A
    /// next-page fetch still in flight is superseded: its result will be
    /// discarded when it arrives.
    pub async fn search(&self, query: &str) -> bool {
        let generation = {
            let mut session = self.inner.session.lock();
            match session.outstanding {
                Some(Fetch::FirstPage) => {
                    tracing::debug!(query, pending = %session.query, "search dropped: first page already loading");
                    return false;
                }
                Some(Fetch::NextPage) => {
                    tracing::debug!(query, superseded = %session.query, "superseding next-page fetch");
                }
                None => {}
            }
            let generation = session.restart(query);
            self.inner.publish(SearchState::Loading);
            generation
        };

        self.dispatch(generation, Fetch::FirstPage, query.to_owned(), 1).await;
        true
    }

    /// Fetch the page after the current one and append it to the session.
    ///
    /// Dropped (returns `false`) when a fetch is outstanding, when no more
    /// pages exist, or when `query` is not the active session's query.
    pub async fn load_next_page(&self, query: &str) -> bool {
        let (generation, page) = {
            let mut session = self.inner.session.lock();
            if session.outstanding.is_some() || !session.has_more {
                return false;
            }
            if session.query != query {
                tracing::debug!(query, active = %session.query, "next page dropped: query is not the active session");
                return false;
            }
            session.current_page += 1;
            session.outstanding = Some(Fetch::NextPage);
            self.inner.publish(SearchState::LoadingMore);
            (session.generation, session.current_page)
        };

        self.dispatch(generation, Fetch::NextPage, query.to_owned(), page).await;
        true
    }

    /// Whether the caller showing item `index` should request the next page.
    ///
    /// True when nothing is loading, more pages exist, and at most
    /// `prefetch_threshold` items remain after `index`. Pure query.
    pub fn should_load_more(&self, index: usize) -> bool {
        let session = self.inner.session.lock();
        let remaining = session.items.len().saturating_sub(index.saturating_add(1));
        session.outstanding.is_none() && session.has_more && remaining <= self.inner.config.prefetch_threshold
    }

    pub fn item_at(&self, index: usize) -> Option<C::Item> {
        self.inner.session.lock().items.get(index).cloned()
    }

    /// Snapshot of the accumulated items of the active session.
    pub fn items(&self) -> Vec<C::Item> {
        self.inner.session.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.session.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn query(&self) -> String {
        self.inner.session.lock().query.clone()
    }

    pub fn total_count(&self) -> u64 {
        self.inner.session.lock().total_count
    }

    pub fn current_page(&self) -> u32 {
        self.inner.session.lock().current_page
    }

    pub fn has_more(&self) -> bool {
        self.inner.session.lock().has_more
    }

    pub fn is_busy(&self) -> bool {
        self.inner.session.lock().outstanding.is_some()
    }

    pub fn config(&self) -> PaginationConfig {
        self.inner.config
    }

    /// Current state.
    pub fn state(&self) -> SearchState<C::Item> {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState<C::Item>> {
        self.inner.state.subscribe()
    }

    /// Receiver for next-page failures. These never replace the main state.
    pub fn pagination_errors(&self) -> broadcast::Receiver<PaginationError> {
        self.inner.pagination_errors.subscribe()
    }

    /// Run the fetch on its own task and apply the result there.
    async fn dispatch(&self, generation: u64, fetch: Fetch, query: String, page: u32) {
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = AssertUnwindSafe(inner.client.search(&query, page, inner.config.page_size))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(Error::Aborted("search client panicked".into())));
            inner.complete(generation, fetch, &query, page, result);
        });

        if let Err(e) = task.await {
            tracing::error!(page, error = %e, "search task did not complete");
        }
    }
}

impl<C: SearchClient> Inner<C> {
    fn publish(&self, state: SearchState<C::Item>) {
        self.state.send_replace(state);
    }

    fn complete(
        &self, generation: u64, fetch: Fetch, query: &str, page: u32, result: Result<SearchPage<C::Item>, Error>,
    ) {
        let mut session = self.session.lock();
        if session.generation != generation {
            tracing::debug!(query, page, "discarding result of superseded session");
            return;
        }
        session.outstanding = None;

        match (fetch, result) {
            (Fetch::FirstPage, Ok(first)) => {
                session.total_count = first.total_count;
                session.has_more = first.has_more;
                session.items = first.items;
                tracing::debug!(query, items = session.items.len(), total = session.total_count, "first page loaded");
                if session.items.is_empty() {
                    self.publish(SearchState::Empty);
                } else {
                    self.publish(SearchState::Success {
                        items: session.items.clone(),
                        total_count: session.total_count,
                    });
                }
            }
            (Fetch::FirstPage, Err(e)) => {
                tracing::warn!(query, error = %e, "first page failed");
                self.publish(SearchState::Error { message: e.to_string() });
            }
            (Fetch::NextPage, Ok(next)) => {
                session.items.extend(next.items);
                session.has_more = next.has_more;
                tracing::debug!(query, page, items = session.items.len(), "next page appended");
                self.publish(SearchState::Success { items: session.items.clone(), total_count: session.total_count });
            }
            (Fetch::NextPage, Err(e)) => {
                session.current_page = page.saturating_sub(1).max(1);
                tracing::warn!(query, page, error = %e, "next page failed; keeping loaded results");
                // No receivers is fine: nobody is listening for pagination errors.
                let _ = self.pagination_errors.send(PaginationError {
                    query: query.to_owned(),
                    page,
                    message: e.to_string(),
                });
                self.restore(&session);
            }
        }
    }

    /// Re-publish the settled state of the session after a failed page load.
    fn restore(&self, session: &Session<C::Item>) {
        if session.items.is_empty() {
            self.publish(SearchState::Empty);
        } else {
            self.publish(SearchState::Success { items: session.items.clone(), total_count: session.total_count });
        }
    }
}
