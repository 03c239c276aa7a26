//! Log extraction error types.

use thiserror::Error;

/// Errors that can occur while querying a log source or configuring a run.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("log backend timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("log backend failed: {0}")]
    Backend(String),

    #[error("invalid unit name: {0}")]
    InvalidUnit(String),

    #[error("unknown categories: {}", .0.join(", "))]
    UnknownCategories(Vec<String>),
}

/// Convenience alias for log extraction results.
pub type LogResult<T> = Result<T, LogError>;
