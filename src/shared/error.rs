use serde::Serialize;
use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// All variants are serializable so they can cross the host boundary intact.
#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// The gesture did not resolve to a usable word. Never surfaced to the
    /// user; callers drop it silently.
    #[error("Invalid selection")]
    InvalidSelection,

    /// The dictionary service has no entry for the word.
    #[error("No entry found for '{0}'")]
    LookupNotFound(String),

    /// Transport-level failure talking to the dictionary service.
    #[error("Network error: {0}")]
    Network(String),

    /// The collection store could not be read or written. Callers degrade to
    /// a no-op for the current operation.
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid input or parameter.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// File or database I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
