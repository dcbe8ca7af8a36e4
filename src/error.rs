//! Error types
//!
//! Unified error handling for the reading engine. Algorithmic edge cases
//! (empty input, skipped heading levels, oversized fragments) are resolved by
//! documented fallback behavior in the components themselves and never appear
//! here; only configuration and collaborator failures surface to callers.

use thiserror::Error;

/// Unified reading-engine error type
#[derive(Debug, Error)]
pub enum ReaderError {
    /// No extraction capability registered for a file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Raw text or style hints inconsistent with the selected extraction mode
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Non-positive page budget; fatal, never silently clamped
    #[error("Invalid page budget: {0} (must be positive)")]
    BudgetConfiguration(i64),

    /// Configuration value could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Key/value store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Persisted artifact could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Offloaded compute task failed to complete
    #[error("Blocking task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for ReaderError {
    fn from(err: tokio::task::JoinError) -> Self {
        ReaderError::Join(err.to_string())
    }
}

/// Result type alias for reading-engine operations
pub type Result<T> = std::result::Result<T, ReaderError>;
