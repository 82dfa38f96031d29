//! Centralized error types for the topics writer.

use thiserror::Error;

/// Main error type for topic operations.
///
/// A missing topic is never an error: reads return `None` and deletes
/// return `false`.
#[derive(Error, Debug)]
pub enum TopicsError {
    #[error("Neo4j is unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Batch of {statements} statement(s) failed and was rolled back: {reason}")]
    BatchFailed { statements: usize, reason: String },

    #[error("Malformed topic payload: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("UUID mismatch: requested '{expected}' but payload has '{found}'")]
    UuidMismatch { expected: String, found: String },

    #[error("Unexpected query result: {0}")]
    UnexpectedResult(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for topic operations.
pub type TopicsResult<T> = Result<T, TopicsError>;

impl TopicsError {
    /// Create a backend unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create a batch failure error.
    pub fn batch_failed(statements: usize, reason: impl Into<String>) -> Self {
        Self::BatchFailed {
            statements,
            reason: reason.into(),
        }
    }

    /// Create an unexpected result error.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResult(msg.into())
    }
}
