//! Unified error types for hubsearch.
//!
//! Every failure that crosses a collaborator boundary is folded into [`Error`].
//! The type is `Clone` because a single fetch outcome is handed to every
//! caller waiting on the same resource.

/// Broad failure classes used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, connection or status-code failure.
    Transport,
    /// Malformed payload.
    Decode,
    /// Rejected before any I/O happened.
    Input,
}

/// Unified error types for hubsearch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid resource address.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Connection-level failure or timeout.
    #[error("TRANSPORT_FAILURE: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP_ERROR: status {status}")]
    HttpStatus { status: u16 },

    /// Remote API refused the request because of rate limiting.
    #[error("RATE_LIMITED: {0}")]
    RateLimited(String),

    /// Response body exceeded the configured limit.
    #[error("TOO_LARGE: {0}")]
    TooLarge(String),

    /// Payload could not be decoded.
    #[error("DECODE_FAILURE: {0}")]
    Decode(String),

    /// The background task driving a fetch was cancelled or panicked.
    #[error("ABORTED: {0}")]
    Aborted(String),
}

impl Error {
    /// Classify the error into the transport/decode/input taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::InvalidUrl(_) => ErrorKind::Input,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Transport(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited(_)
            | Error::TooLarge(_)
            | Error::Aborted(_) => ErrorKind::Transport,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }
}
