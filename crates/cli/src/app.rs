//! Wiring of the search controller, avatar cache and search history.

use anyhow::{Result, bail};
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use hubsearch_client::{FetchConfig, GitHubClient, GitHubConfig, HttpFetchClient};
use hubsearch_core::{
    AppConfig, ImageDecoder, MemoryRecentStore, PaginatedSearchController, RecentSearches, Repository,
    ResourceCache, SearchState,
};

use crate::output;

pub struct App {
    search: PaginatedSearchController<GitHubClient>,
    avatars: ResourceCache<ImageDecoder>,
    recent: RecentSearches<MemoryRecentStore>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let github = GitHubClient::new(GitHubConfig::from_app(config))?;
        let fetcher = HttpFetchClient::new(FetchConfig::from_app(config))?;

        Ok(Self {
            search: PaginatedSearchController::new(github, config.pagination()),
            avatars: ResourceCache::new(Arc::new(fetcher), ImageDecoder, config.image_cache_capacity)?,
            recent: RecentSearches::new(MemoryRecentStore::new(config.recent_search_limit)),
        })
    }

    pub fn search(&self) -> &PaginatedSearchController<GitHubClient> {
        &self.search
    }

    pub fn avatars(&self) -> &ResourceCache<ImageDecoder> {
        &self.avatars
    }

    pub fn recent(&self) -> &RecentSearches<MemoryRecentStore> {
        &self.recent
    }

    /// Print failed page loads as they happen.
    pub fn report_pagination_errors(&self) -> JoinHandle<()> {
        let mut errors = self.search.pagination_errors();
        tokio::spawn(async move {
            loop {
                match errors.recv().await {
                    Ok(failure) => eprintln!("{}", output::pagination_warning(&failure)),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "pagination error reporter fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Run `query` as a new search and print the first page.
    pub async fn run_search(&self, query: &str) -> SearchState<Repository> {
        let query = query.trim();
        self.recent.record(query);

        if !self.search.search(query).await {
            println!("a search is already loading");
            return self.search.state();
        }

        let state = self.search.state();
        println!("{}", output::summary(query, &state));
        if let SearchState::Success { items, .. } = &state {
            print_repositories(items, 0);
        }
        state
    }

    /// Load the next page of the active search and print what it added.
    /// Returns whether a page was requested.
    pub async fn more(&self) -> bool {
        let shown = self.search.len();
        let query = self.search.query();
        if !self.search.load_next_page(&query).await {
            return false;
        }
        let items = self.search.items();
        print_repositories(&items[shown.min(items.len())..], shown);
        true
    }

    /// Fetch the avatars of the current results through the cache.
    pub async fn fetch_avatars(&self) {
        let repositories = self.search.items();
        let lookups = repositories.iter().map(|repo| async move {
            let image = match repo.avatar_key() {
                Ok(key) => self.avatars.get(&key).await,
                Err(e) => Err(e),
            };
            output::avatar_line(repo, &image)
        });

        for line in join_all(lookups).await {
            println!("{line}");
        }
        println!("{}", output::cache_stats(&self.avatars.stats()));
    }

    /// One-shot mode: search, then scroll through up to `pages` pages.
    pub async fn run_once(&self, query: &str, pages: u32, avatars: bool) -> Result<()> {
        let state = self.run_search(query).await;
        if let SearchState::Error { message } = state {
            bail!("search failed: {message}");
        }

        let mut loaded = 1;
        let mut index = 0;
        while loaded < pages && index < self.search.len() {
            if self.search.should_load_more(index) {
                let before = self.search.current_page();
                if !self.more().await || self.search.current_page() == before {
                    break;
                }
                loaded += 1;
            }
            index += 1;
        }

        if avatars {
            self.fetch_avatars().await;
        }
        Ok(())
    }
}

fn print_repositories(repositories: &[Repository], offset: usize) {
    for (i, repo) in repositories.iter().enumerate() {
        println!("{}", output::repository_line(offset + i + 1, repo));
    }
}
