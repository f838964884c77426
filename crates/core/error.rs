//! Error types for dataset loading and engine configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BloomError>;

/// Errors surfaced by the engine's boundaries.
///
/// Filtering, set intersection and timeline stepping are total over
/// well-formed state and never produce these; they come from loading data,
/// building requests and reading configuration.
#[derive(Debug, Error)]
pub enum BloomError {
    /// Ingestion produced zero usable records, or the payload was unreadable.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// Fetch or transport failure.
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BloomError {
    /// Whether the failure is worth retrying and should be shown as a
    /// transient notice rather than a blocking one.
    pub fn is_transient(&self) -> bool {
        matches!(self, BloomError::Network(_) | BloomError::Io(_))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for BloomError {
    fn from(err: reqwest::Error) -> Self {
        BloomError::Network(err.to_string())
    }
}
