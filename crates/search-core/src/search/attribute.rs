//! Attribute matching between a structured query and candidate records
//!
//! Scoring is additive over *active* fields only, i.e. fields where the query
//! expresses a real constraint:
//!
//! | Field        | Active when                           | Points | Match rule                          |
//! |--------------|---------------------------------------|--------|-------------------------------------|
//! | room_type    | non-empty and not "any"               | 1      | query is a substring of candidate   |
//! | max_capacity | greater than 0                        | 1      | candidate capacity >= query         |
//! | view_type    | non-empty, not "any" or "standard"    | 1      | query is a substring of candidate   |
//! | features     | non-empty                             | 1 each | feature is a substring of any candidate feature |
//!
//! String comparisons are case-insensitive. The normalized score is the
//! matched points over the available points, or 0.0 when the query has no
//! active field at all, so an all-wildcard query never passes a positive
//! threshold.

use super::by_score_desc;
use room_types::{CandidateRecord, Corpus, FeatureMatch, FieldMatch, MatchDetail, StructuredQuery};
use tracing::debug;

const ANY: &str = "any";
const UNCONSTRAINED_VIEWS: &[&str] = &[ANY, "standard"];

/// A candidate that passed the keyword channel threshold
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordHit {
    pub id: String,
    pub score: f32,
    pub detail: MatchDetail,
}

/// Lowercased query constraints, `None` where the field is inactive
#[derive(Debug)]
struct ActiveTerms {
    room_type: Option<String>,
    capacity: Option<u32>,
    view_type: Option<String>,
    features: Vec<String>,
    description: String,
}

impl ActiveTerms {
    fn from_query(query: &StructuredQuery) -> Self {
        let room_type = query.room_type.to_lowercase();
        let view_type = query.view_type.to_lowercase();

        Self {
            room_type: (!room_type.is_empty() && room_type != ANY).then_some(room_type),
            capacity: Some(query.capacity()).filter(|c| *c > 0),
            view_type: (!view_type.is_empty() && !UNCONSTRAINED_VIEWS.contains(&view_type.as_str()))
                .then_some(view_type),
            features: query.features.iter().map(|f| f.to_lowercase()).collect(),
            description: query.description.clone(),
        }
    }

    fn max_score(&self) -> f32 {
        let scalar = [
            self.room_type.is_some(),
            self.capacity.is_some(),
            self.view_type.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count();

        (scalar + self.features.len()) as f32
    }

    fn score(&self, candidate: &CandidateRecord) -> (f32, MatchDetail) {
        let mut score = 0.0f32;
        let mut detail = MatchDetail {
            query_description: Some(self.description.clone()),
            ..Default::default()
        };

        if let Some(wanted) = &self.room_type {
            let found = candidate.room_type.to_lowercase();
            let matched = found.contains(wanted.as_str());
            if matched {
                score += 1.0;
            }
            detail.room_type = Some(FieldMatch {
                query: wanted.clone(),
                candidate: found,
                matched,
            });
        }

        if let Some(wanted) = self.capacity {
            let found = candidate.capacity();
            let matched = found >= wanted;
            if matched {
                score += 1.0;
            }
            detail.max_capacity = Some(FieldMatch {
                query: wanted,
                candidate: found,
                matched,
            });
        }

        if let Some(wanted) = &self.view_type {
            let found = candidate.view_type.to_lowercase();
            let matched = found.contains(wanted.as_str());
            if matched {
                score += 1.0;
            }
            detail.view_type = Some(FieldMatch {
                query: wanted.clone(),
                candidate: found,
                matched,
            });
        }

        if !self.features.is_empty() {
            let found: Vec<String> = candidate.features.iter().map(|f| f.to_lowercase()).collect();
            let matches: Vec<String> = self
                .features
                .iter()
                .filter(|wanted| found.iter().any(|f| f.contains(wanted.as_str())))
                .cloned()
                .collect();
            score += matches.len() as f32;
            detail.features = Some(FeatureMatch {
                query: self.features.clone(),
                candidate: found,
                matches,
            });
        }

        let max_score = self.max_score();
        let normalized = if max_score > 0.0 { score / max_score } else { 0.0 };
        (normalized, detail)
    }
}

/// Rule-based attribute matcher
///
/// Stateless; one instance can score any number of queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeMatcher;

impl AttributeMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Score one candidate against one query.
    ///
    /// Returns the normalized score in `[0, 1]` and the per-field breakdown.
    pub fn match_candidate(
        &self,
        query: &StructuredQuery,
        candidate: &CandidateRecord,
    ) -> (f32, MatchDetail) {
        ActiveTerms::from_query(query).score(candidate)
    }

    /// Score every candidate and keep those at or above `min_score`.
    ///
    /// Candidates below the threshold are dropped, not merely ranked low.
    /// Results are sorted by score descending; equal scores keep corpus order.
    pub fn keyword_search(
        &self,
        query: &StructuredQuery,
        corpus: &Corpus,
        min_score: f32,
    ) -> Vec<KeywordHit> {
        let terms = ActiveTerms::from_query(query);

        let mut hits: Vec<KeywordHit> = corpus
            .iter()
            .filter_map(|(id, candidate)| {
                let (score, detail) = terms.score(candidate);
                (score >= min_score).then(|| KeywordHit {
                    id: id.clone(),
                    score,
                    detail,
                })
            })
            .collect();

        hits.sort_by(|a, b| by_score_desc(a.score, b.score));

        debug!(
            "Keyword channel: {}/{} candidates at or above {:.2}",
            hits.len(),
            corpus.len(),
            min_score
        );
        hits
    }
}
