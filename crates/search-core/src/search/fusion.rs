//! Weighted score fusion for hybrid search
//!
//! Both channels filter independently, then their survivors are merged:
//!
//! ```text
//! combined(id) = keyword_weight * keyword(id) + semantic_weight * semantic(id)
//! ```
//!
//! where a channel that did not keep `id` contributes 0. The result set is
//! the UNION of both channels, so a candidate that fails the attribute
//! threshold can still rank on description similarity and vice versa.
//!
//! Sorting happens before truncation: the output is always a prefix of the
//! full ranking.

use super::attribute::AttributeMatcher;
use super::by_score_desc;
use super::similarity::SimilarityScorer;
use crate::config::SearchConfig;
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use room_types::{Corpus, MatchDetail, ScoredCandidate, StructuredQuery};
use std::collections::BTreeMap;
use tracing::info;

/// Weighted sum of the two channel scores.
pub fn combine_scores(keyword: f32, semantic: f32, keyword_weight: f32, semantic_weight: f32) -> f32 {
    keyword_weight * keyword + semantic_weight * semantic
}

/// What each channel contributed for one candidate
#[derive(Debug, Default)]
struct ChannelHits {
    keyword: Option<(f32, MatchDetail)>,
    semantic: Option<f32>,
}

impl ChannelHits {
    fn into_scored(self, id: String, keyword_weight: f32, semantic_weight: f32) -> ScoredCandidate {
        let (keyword_score, mut detail) = self.keyword.unwrap_or_default();
        let semantic_score = self.semantic.unwrap_or(0.0);
        let combined_score =
            combine_scores(keyword_score, semantic_score, keyword_weight, semantic_weight);

        detail.keyword_score = keyword_score;
        detail.semantic_score = semantic_score;
        detail.combined_score = combined_score;

        ScoredCandidate {
            id,
            combined_score,
            detail,
        }
    }
}

/// Hybrid ranker combining attribute matching and semantic similarity
pub struct HybridRanker<P> {
    matcher: AttributeMatcher,
    scorer: SimilarityScorer<P>,
    config: SearchConfig,
}

impl<P: EmbeddingProvider> HybridRanker<P> {
    /// Create a ranker; fails if `config` does not validate.
    pub fn new(provider: P, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            matcher: AttributeMatcher::new(),
            scorer: SimilarityScorer::new(provider).with_source(config.description_source),
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn scorer(&self) -> &SimilarityScorer<P> {
        &self.scorer
    }

    /// Rank `corpus` against `query` with the configured thresholds and
    /// result limit.
    pub fn rank(&self, query: &StructuredQuery, corpus: &Corpus) -> Vec<ScoredCandidate> {
        self.rank_with(
            query,
            corpus,
            self.config.keyword_min_score,
            self.config.semantic_min_score,
            self.config.max_results,
        )
    }

    /// Rank with explicit thresholds and limit, keeping the configured weights.
    pub fn rank_with(
        &self,
        query: &StructuredQuery,
        corpus: &Corpus,
        keyword_min_score: f32,
        semantic_min_score: f32,
        max_results: usize,
    ) -> Vec<ScoredCandidate> {
        let keyword_hits = self.matcher.keyword_search(query, corpus, keyword_min_score);
        let semantic_hits = self
            .scorer
            .semantic_search(&query.description, corpus, semantic_min_score);

        let keyword_count = keyword_hits.len();
        let semantic_count = semantic_hits.len();

        // Keyed by id, so iteration follows corpus order
        let mut merged: BTreeMap<String, ChannelHits> = BTreeMap::new();
        for hit in keyword_hits {
            merged.entry(hit.id).or_default().keyword = Some((hit.score, hit.detail));
        }
        for hit in semantic_hits {
            merged.entry(hit.id).or_default().semantic = Some(hit.similarity);
        }

        let mut results: Vec<ScoredCandidate> = merged
            .into_iter()
            .map(|(id, hits)| {
                hits.into_scored(id, self.config.keyword_weight, self.config.semantic_weight)
            })
            .collect();

        results.sort_by(|a, b| by_score_desc(a.combined_score, b.combined_score));
        let candidates = results.len();
        results.truncate(max_results);

        info!(
            "Hybrid search: {} keyword, {} semantic, {} combined, returning {}",
            keyword_count,
            semantic_count,
            candidates,
            results.len()
        );

        results
    }
}
