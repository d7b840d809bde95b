//! Shared data model for hotel room search.
//!
//! Queries and candidate records are produced by external collaborators (a
//! language model parsing user text, a vision model describing room images)
//! and consumed read-only by the ranking core.

pub mod detail;
pub mod types;

pub use detail::{FeatureMatch, FieldMatch, MatchDetail, ScoredCandidate};
pub use types::{CandidateRecord, Corpus, StructuredQuery};
