//! Error types for snapshot fetching.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors returned by a `SnapshotFetcher`.
///
/// Every error is either transient (worth retrying on the next cycle) or
/// permanent (retrying cannot succeed without operator action).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("authentication rejected (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Whether the error may clear up on its own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(_)
                | FetchError::Timeout(_)
                | FetchError::RateLimited
                | FetchError::Server { .. }
        )
    }

    /// Classify an HTTP error status returned by the provider.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => FetchError::RateLimited,
            401 | 403 => FetchError::Unauthorized { status, message },
            500..=599 => FetchError::Server { status, message },
            _ => FetchError::Rejected { status, message },
        }
    }
}
