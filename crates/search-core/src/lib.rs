//! Search Core - Hybrid ranking of hotel room images against a structured query
//!
//! This crate provides:
//! - Attribute matching of structured queries against candidate records
//! - Cosine similarity over cached text embeddings
//! - Weighted fusion of both channels into one ranked, truncated result set
//! - Presentation of ranked results for UI and text front ends
//! - Configuration management

pub mod config;
pub mod embeddings;
pub mod error;
pub mod present;
pub mod search;

// Re-export commonly used types
pub use config::{DescriptionSource, SearchConfig};
pub use embeddings::{EmbeddingCache, EmbeddingProvider, HashEmbedder};
pub use error::{Result, SearchError};
pub use present::{explain_query, FieldMatches, RankedRoom, ResultPresenter, SearchReport};
pub use search::{AttributeMatcher, HybridRanker, SimilarityScorer};
