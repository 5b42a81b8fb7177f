//! Plain-text rendering of results for the terminal.

use std::sync::Arc;

use hubsearch_core::{CacheStats, Error, Image, PaginationError, RecentSearch, Repository, SearchState};

/// Star counts as shown in listings: `950`, `1.2k`, `27k`.
pub fn compact_count(count: u64) -> String {
    match count {
        0..1_000 => count.to_string(),
        1_000..10_000 => format!("{:.1}k", count as f64 / 1_000.0),
        10_000..1_000_000 => format!("{}k", count / 1_000),
        _ => format!("{:.1}m", count as f64 / 1_000_000.0),
    }
}

pub fn repository_line(position: usize, repo: &Repository) -> String {
    let mut line = format!("{:>4}. {}  ★ {}", position, repo.full_name, compact_count(repo.star_count));
    if let Some(language) = &repo.language {
        line.push_str(&format!("  [{language}]"));
    }
    if let Some(description) = repo.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        line.push_str(&format!("\n      {description}"));
    }
    line
}

/// One-line description of a settled search.
pub fn summary(query: &str, state: &SearchState<Repository>) -> String {
    match state {
        SearchState::Success { items, total_count } => {
            format!("{} repositories match \"{}\" (showing {})", total_count, query, items.len())
        }
        SearchState::Empty => format!("no repositories match \"{query}\""),
        SearchState::Error { message } => format!("search for \"{query}\" failed: {message}"),
        SearchState::Idle => "no search yet".to_string(),
        SearchState::Loading | SearchState::LoadingMore => format!("still loading \"{query}\""),
    }
}

pub fn pagination_warning(failure: &PaginationError) -> String {
    format!(
        "warning: page {} of \"{}\" failed to load ({}); run :more to retry",
        failure.page, failure.query, failure.message
    )
}

pub fn avatar_line(repo: &Repository, image: &Result<Arc<Image>, Error>) -> String {
    match image {
        Ok(image) => {
            let size = image
                .dimensions
                .map(|(w, h)| format!(" {w}x{h}"))
                .unwrap_or_default();
            format!("{:<24} {}{} ({} bytes)", repo.owner_name, image.format.mime_type(), size, image.len())
        }
        Err(e) => format!("{:<24} unavailable: {}", repo.owner_name, e),
    }
}

pub fn cache_stats(stats: &CacheStats) -> String {
    format!(
        "avatar cache: {}/{} entries, {} fetches, {} hits, {} joined in flight",
        stats.entries, stats.capacity, stats.fetches, stats.hits, stats.coalesced
    )
}

pub fn recent_line(entry: &RecentSearch) -> String {
    format!("{}  {}", entry.searched_at.format("%Y-%m-%d %H:%M"), entry.query)
}
