//! Observable search state.

/// Current phase of a search session. Exactly one is current at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState<T> {
    /// No query issued yet.
    #[default]
    Idle,
    /// First page of a query is being fetched.
    Loading,
    /// A further page is being fetched; the accumulated list stays valid.
    LoadingMore,
    Success { items: Vec<T>, total_count: u64 },
    /// The first page came back with no items.
    Empty,
    /// The first page failed.
    Error { message: String },
}

impl<T> SearchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading | SearchState::LoadingMore)
    }

    /// Whether the state is one a session settles in after a fetch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchState::Success { .. } | SearchState::Empty | SearchState::Error { .. })
    }
}

/// A failed next-page load, reported beside the main state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationError {
    pub query: String,
    /// The page that failed to load.
    pub page: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(SearchState::<u32>::default(), SearchState::Idle);
    }

    #[test]
    fn test_state_classification() {
        assert!(SearchState::<u32>::Loading.is_loading());
        assert!(SearchState::<u32>::LoadingMore.is_loading());
        assert!(!SearchState::<u32>::Idle.is_terminal());
        assert!(SearchState::<u32>::Empty.is_terminal());
        assert!(SearchState::Success { items: vec![1u32], total_count: 1 }.is_terminal());
        assert!(SearchState::<u32>::Error { message: "boom".into() }.is_terminal());
    }
}
