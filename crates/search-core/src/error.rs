//! Error types for the search core

use thiserror::Error;

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by the search core.
///
/// Ranking itself never fails; these surface from configuration and from
/// embedding providers, whose failures the semantic channel absorbs.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The embedding provider could not produce a vector.
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Two vectors in one similarity computation differ in length.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A vector with zero magnitude has no direction to compare.
    #[error("Embedding has zero magnitude")]
    ZeroVector,

    /// Configuration value out of range or unparsable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
