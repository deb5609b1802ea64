//! Error types for persistence and score submission.

use thiserror::Error;

/// A single remote leaderboard call failed.
///
/// Never surfaced past the persistence adapter: the call is retried once
/// against local storage instead.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed remote response: {0}")]
    Decode(String),

    #[error("remote store returned no row for the insert")]
    EmptyInsert,
}

/// Why the remote leaderboard was not selected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteUnavailable {
    #[error("remote credentials are not configured")]
    MissingCredentials,

    #[error("remote credentials still hold placeholder values")]
    PlaceholderCredentials,

    #[error("remote endpoint is not an http(s) URL: {0}")]
    InvalidEndpoint(String),

    #[error("remote leaderboard is not supported on this platform")]
    UnsupportedPlatform,
}

/// Local storage failed. There is nothing left to fall back to, so these
/// propagate to the caller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,

    #[error("local storage rejected the write: {0}")]
    Write(String),

    #[error("stored leaderboard is corrupt: {0}")]
    Corrupt(String),

    #[error("failed to encode leaderboard: {0}")]
    Encode(String),
}

/// Submitting a finished game failed.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("failed to save score: {0}")]
    Storage(#[from] StorageError),
}
