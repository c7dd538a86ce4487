//! Error types for the lottery engine.

use thiserror::Error;

/// Result type for lottery operations.
pub type LotteryResult<T> = Result<T, LotteryError>;

/// Errors that can occur while managing the prize pool or drawing.
#[derive(Debug, Error)]
pub enum LotteryError {
    /// Malformed prize input or a value outside the accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A prize or consolation reward with the same name already exists.
    #[error("already exists: \"{0}\"")]
    DuplicateName(String),

    /// No prize or consolation reward matches the given identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// The persisted state could not be parsed.
    #[error("corrupt state file: {0}")]
    CorruptState(String),

    /// The pool configuration cannot produce odds (e.g. non-positive budget).
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Reading or writing the state file failed.
    #[error("state file I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the state failed.
    #[error("state serialization: {0}")]
    Json(#[from] serde_json::Error),
}
