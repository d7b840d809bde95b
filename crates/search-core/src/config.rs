//! Configuration management for hybrid search
//!
//! Weights and thresholds are tuning constants with no derivation behind the
//! defaults. They are carried as configuration so deployments can adjust them.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default weight applied to the attribute (keyword) channel
pub const DEFAULT_KEYWORD_WEIGHT: f32 = 0.7;
/// Default weight applied to the semantic channel
pub const DEFAULT_SEMANTIC_WEIGHT: f32 = 0.3;
/// Default hard filter for normalized attribute scores
pub const DEFAULT_KEYWORD_MIN_SCORE: f32 = 0.3;
/// Default hard filter for cosine similarity
pub const DEFAULT_SEMANTIC_MIN_SCORE: f32 = 0.5;
/// Default result set size
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Which candidate text the semantic channel embeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionSource {
    /// The record's free-text description
    #[default]
    Description,
    /// A composite of every record field followed by the description
    Profile,
}

impl FromStr for DescriptionSource {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "description" => Ok(Self::Description),
            "profile" => Ok(Self::Profile),
            other => Err(SearchError::InvalidConfig(format!(
                "Unknown description source: {}",
                other
            ))),
        }
    }
}

/// Hybrid search configuration
///
/// Weights are applied independently and are not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub keyword_weight: f32,
    pub semantic_weight: f32,
    /// Candidates whose normalized attribute score is below this are dropped
    /// from the keyword channel
    pub keyword_min_score: f32,
    /// Candidates whose similarity is below this are dropped from the
    /// semantic channel
    pub semantic_min_score: f32,
    pub max_results: usize,
    pub description_source: DescriptionSource,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword_weight: DEFAULT_KEYWORD_WEIGHT,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
            keyword_min_score: DEFAULT_KEYWORD_MIN_SCORE,
            semantic_min_score: DEFAULT_SEMANTIC_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            description_source: DescriptionSource::default(),
        }
    }
}

impl SearchConfig {
    /// Set both channel weights
    pub fn with_weights(mut self, keyword_weight: f32, semantic_weight: f32) -> Self {
        self.keyword_weight = keyword_weight;
        self.semantic_weight = semantic_weight;
        self
    }

    /// Set both channel thresholds
    pub fn with_min_scores(mut self, keyword_min_score: f32, semantic_min_score: f32) -> Self {
        self.keyword_min_score = keyword_min_score;
        self.semantic_min_score = semantic_min_score;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_description_source(mut self, source: DescriptionSource) -> Self {
        self.description_source = source;
        self
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults. Expected variables:
    /// - ROOM_SEARCH_KEYWORD_WEIGHT
    /// - ROOM_SEARCH_SEMANTIC_WEIGHT
    /// - ROOM_SEARCH_KEYWORD_MIN_SCORE
    /// - ROOM_SEARCH_SEMANTIC_MIN_SCORE
    /// - ROOM_SEARCH_MAX_RESULTS
    /// - ROOM_SEARCH_DESCRIPTION_SOURCE: "description" or "profile"
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "ROOM_SEARCH_KEYWORD_WEIGHT")? {
            config.keyword_weight = v;
        }
        if let Some(v) = parse_var(&lookup, "ROOM_SEARCH_SEMANTIC_WEIGHT")? {
            config.semantic_weight = v;
        }
        if let Some(v) = parse_var(&lookup, "ROOM_SEARCH_KEYWORD_MIN_SCORE")? {
            config.keyword_min_score = v;
        }
        if let Some(v) = parse_var(&lookup, "ROOM_SEARCH_SEMANTIC_MIN_SCORE")? {
            config.semantic_min_score = v;
        }
        if let Some(v) = parse_var(&lookup, "ROOM_SEARCH_MAX_RESULTS")? {
            config.max_results = v;
        }
        if let Some(raw) = lookup("ROOM_SEARCH_DESCRIPTION_SOURCE") {
            config.description_source = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the ranker cannot work with
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("keyword_weight", self.keyword_weight),
            ("semantic_weight", self.semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SearchError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        for (name, threshold) in [
            ("keyword_min_score", self.keyword_min_score),
            ("semantic_min_score", self.semantic_min_score),
        ] {
            if threshold.is_nan() {
                return Err(SearchError::InvalidConfig(format!("{} must not be NaN", name)));
            }
        }

        if self.max_results == 0 {
            return Err(SearchError::InvalidConfig(
                "max_results must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            SearchError::InvalidConfig(format!("{} has an invalid value: {:?}", key, raw))
        }),
        None => Ok(None),
    }
}
