//! Search module - Attribute matching, semantic similarity, and hybrid ranking
//!
//! This module provides:
//! - Rule-based attribute matching over structured room fields
//! - Cosine similarity between embedded descriptions
//! - Weighted fusion of both channels into one ranked result set

pub mod attribute;
pub mod fusion;
pub mod similarity;

pub use attribute::{AttributeMatcher, KeywordHit};
pub use fusion::{combine_scores, HybridRanker};
pub use similarity::{cosine_similarity, profile_text, SemanticHit, SimilarityScorer};

use std::cmp::Ordering;

/// Descending order for scores that are never NaN in practice.
///
/// Used with stable sorts so equal scores keep corpus order.
pub(crate) fn by_score_desc(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}
