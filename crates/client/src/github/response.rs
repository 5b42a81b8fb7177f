//! Repository search response types and normalization.

use serde::Deserialize;

use hubsearch_core::search::{Repository, SearchPage};

use super::request::MAX_REACHABLE_RESULTS;

/// Raw response from `GET /search/repositories`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<RepositoryItem>,
}

/// A repository as the API returns it.
#[derive(Debug, Deserialize)]
pub struct RepositoryItem {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

impl From<RepositoryItem> for Repository {
    fn from(raw: RepositoryItem) -> Self {
        Repository {
            id: raw.id,
            name: raw.name,
            full_name: raw.full_name,
            owner_name: raw.owner.login,
            avatar_url: raw.owner.avatar_url,
            description: raw.description,
            html_url: raw.html_url,
            star_count: raw.stargazers_count,
            language: raw.language,
        }
    }
}

impl SearchResponse {
    /// Normalize into a page of repositories.
    ///
    /// `total_count` is reported as the API gives it, while `has_more` only
    /// counts results the API will actually serve.
    pub fn into_page(self, page: u32, per_page: u32) -> SearchPage<Repository> {
        let reachable = self.total_count.min(MAX_REACHABLE_RESULTS);
        SearchPage {
            has_more: hubsearch_core::search::has_more(page, per_page, reachable),
            total_count: self.total_count,
            items: self.items.into_iter().map(Repository::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "id": 44662669,
                "name": "tokio",
                "full_name": "tokio-rs/tokio",
                "owner": {
                    "login": "tokio-rs",
                    "id": 20248544,
                    "avatar_url": "https://avatars.githubusercontent.com/u/20248544?v=4"
                },
                "private": false,
                "description": "A runtime for writing reliable asynchronous applications with Rust.",
                "html_url": "https://github.com/tokio-rs/tokio",
                "stargazers_count": 27000,
                "language": "Rust"
            },
            {
                "id": 1,
                "name": "empty",
                "full_name": "someone/empty",
                "owner": { "login": "someone", "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4" },
                "description": null,
                "html_url": "https://github.com/someone/empty",
                "stargazers_count": 0,
                "language": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_fixture() {
        let raw: SearchResponse = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(raw.total_count, 2);
        assert!(!raw.incomplete_results);

        let page = raw.into_page(1, 30);
        assert!(!page.has_more);
        assert_eq!(page.items.len(), 2);

        let tokio = &page.items[0];
        assert_eq!(tokio.owner_name, "tokio-rs");
        assert_eq!(tokio.full_name, "tokio-rs/tokio");
        assert_eq!(tokio.star_count, 27000);
        assert_eq!(tokio.language.as_deref(), Some("Rust"));

        let empty = &page.items[1];
        assert_eq!(empty.description, None);
        assert_eq!(empty.language, None);
    }

    #[test]
    fn test_has_more_from_total() {
        let raw = SearchResponse { total_count: 100, incomplete_results: false, items: Vec::new() };
        assert!(raw.into_page(3, 30).has_more);
        let raw = SearchResponse { total_count: 100, incomplete_results: false, items: Vec::new() };
        assert!(!raw.into_page(4, 30).has_more);
    }

    #[test]
    fn test_has_more_capped_at_reachable_window() {
        let raw = SearchResponse { total_count: 250_000, incomplete_results: true, items: Vec::new() };
        let page = raw.into_page(33, 30);
        assert!(page.has_more);
        assert_eq!(page.total_count, 250_000);

        let raw = SearchResponse { total_count: 250_000, incomplete_results: true, items: Vec::new() };
        assert!(!raw.into_page(34, 30).has_more);
    }

    #[test]
    fn test_missing_items_defaults_empty() {
        let raw: SearchResponse = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert!(raw.items.is_empty());
        assert!(!raw.into_page(1, 30).has_more);
    }
}
