//! Semantic similarity between a query description and candidate descriptions
//!
//! Each text is embedded once through the scorer's [`EmbeddingCache`] and
//! compared with raw cosine similarity. The value is not clamped: it lies in
//! `[-1, 1]` mathematically and, for text embeddings, usually near `[0, 1]`.
//!
//! The channel degrades instead of failing:
//! - an empty query description disables the channel for that search
//! - a candidate with an empty description is skipped
//! - a candidate whose embedding fails (provider error, timeout, wrong
//!   dimension) is skipped with a warning

use super::by_score_desc;
use crate::config::DescriptionSource;
use crate::embeddings::{EmbeddingCache, EmbeddingProvider};
use crate::error::{Result, SearchError};
use room_types::{CandidateRecord, Corpus};
use tracing::{debug, warn};

/// A candidate that passed the semantic channel threshold
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticHit {
    pub id: String,
    pub similarity: f32,
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Vectors of different length, or with zero magnitude, have no defined
/// similarity and are reported as errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SearchError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SearchError::ZeroVector);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Composite text covering every field of a record.
pub fn profile_text(record: &CandidateRecord) -> String {
    format!(
        "Room type: {}, View: {}, Features: {}, Max capacity: {}, Description: {}",
        record.room_type,
        record.view_type,
        record.features.join(", "),
        record.capacity(),
        record.description
    )
}

/// Embedding-based similarity scorer
///
/// Owns the embedding cache, so every text is embedded at most once for the
/// lifetime of the scorer.
pub struct SimilarityScorer<P> {
    cache: EmbeddingCache<P>,
    source: DescriptionSource,
}

impl<P: EmbeddingProvider> SimilarityScorer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            cache: EmbeddingCache::new(provider),
            source: DescriptionSource::default(),
        }
    }

    /// Choose which candidate text is embedded
    pub fn with_source(mut self, source: DescriptionSource) -> Self {
        self.source = source;
        self
    }

    pub fn source(&self) -> DescriptionSource {
        self.source
    }

    pub fn cache(&self) -> &EmbeddingCache<P> {
        &self.cache
    }

    /// Similarity between two texts.
    ///
    /// Empty text has no meaningful embedding and is rejected without a
    /// provider call.
    pub fn similarity(&self, query_description: &str, candidate_description: &str) -> Result<f32> {
        if query_description.is_empty() || candidate_description.is_empty() {
            return Err(SearchError::Embedding("empty text".to_string()));
        }
        let query = self.cache.get(query_description)?;
        let candidate = self.cache.get(candidate_description)?;
        cosine_similarity(&query, &candidate)
    }

    /// Score every candidate against `query_description`, keeping those
    /// with similarity at or above `min_score`.
    ///
    /// Results are sorted by similarity descending; equal values keep corpus
    /// order.
    pub fn semantic_search(
        &self,
        query_description: &str,
        corpus: &Corpus,
        min_score: f32,
    ) -> Vec<SemanticHit> {
        if query_description.is_empty() {
            debug!("Semantic channel inactive: empty query description");
            return Vec::new();
        }

        let query = match self.cache.get(query_description) {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Semantic channel disabled, query embedding failed: {}", e);
                return Vec::new();
            }
        };

        let mut hits = Vec::new();
        for (id, record) in corpus {
            if record.description.is_empty() {
                continue;
            }

            let text = match self.source {
                DescriptionSource::Description => record.description.clone(),
                DescriptionSource::Profile => profile_text(record),
            };

            let similarity = match self
                .cache
                .get(&text)
                .and_then(|candidate| cosine_similarity(&query, &candidate))
            {
                Ok(similarity) => similarity,
                Err(e) => {
                    warn!("Skipping {} in semantic channel: {}", id, e);
                    continue;
                }
            };

            if similarity >= min_score {
                hits.push(SemanticHit {
                    id: id.clone(),
                    similarity,
                });
            }
        }

        hits.sort_by(|a, b| by_score_desc(a.similarity, b.similarity));

        debug!(
            "Semantic channel: {}/{} candidates at or above {:.2}",
            hits.len(),
            corpus.len(),
            min_score
        );
        hits
    }
}
