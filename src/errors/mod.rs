use std::path::PathBuf;

use thiserror::Error;

/// Failures fetching or interpreting a user's profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("User '{0}' not found on LeetCode")]
    UserNotFound(String),

    #[error("LeetCode unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Malformed profile payload: {0}")]
    MalformedPayload(String),
}

impl SourceError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::SourceUnavailable(reason.into())
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }
}

/// Failures writing the backing file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to persist leaderboard to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Everything a leaderboard operation can report to its caller
#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Persistence(#[from] StoreError),

    #[error("User '{0}' is not on the leaderboard")]
    RecordNotFound(String),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
}
