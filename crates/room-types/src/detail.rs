use serde::{Deserialize, Serialize};

/// Outcome of comparing one scalar field of a query against a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch<T> {
    pub query: T,
    pub candidate: T,
    #[serde(rename = "match")]
    pub matched: bool,
}

/// Outcome of comparing the feature lists.
///
/// All lists are lowercased. `matches` holds the query features that were
/// found in some candidate feature, in query order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatch {
    pub query: Vec<String>,
    pub candidate: Vec<String>,
    pub matches: Vec<String>,
}

impl FeatureMatch {
    /// Whether `feature` is among the matched query features.
    pub fn is_matched(&self, feature: &str) -> bool {
        let feature = feature.to_lowercase();
        self.matches.iter().any(|m| *m == feature)
    }
}

/// Per-field breakdown of why a candidate scored what it did.
///
/// Only fields the query actively constrained carry a breakdown. A candidate
/// that reached the results through the semantic channel alone has no
/// breakdown at all and no `query_description`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub query_description: Option<String>,
    pub room_type: Option<FieldMatch<String>>,
    pub max_capacity: Option<FieldMatch<u32>>,
    pub view_type: Option<FieldMatch<String>>,
    pub features: Option<FeatureMatch>,
    #[serde(default)]
    pub keyword_score: f32,
    #[serde(default)]
    pub semantic_score: f32,
    #[serde(default)]
    pub combined_score: f32,
}

impl MatchDetail {
    /// Whether the attribute matcher produced any per-field breakdown.
    pub fn has_breakdown(&self) -> bool {
        self.room_type.is_some()
            || self.max_capacity.is_some()
            || self.view_type.is_some()
            || self.features.is_some()
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: String,
    pub combined_score: f32,
    pub detail: MatchDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_membership_is_case_insensitive() {
        let features = FeatureMatch {
            query: vec!["balcony".to_string(), "minibar".to_string()],
            candidate: vec!["private balcony".to_string()],
            matches: vec!["balcony".to_string()],
        };
        assert!(features.is_matched("Balcony"));
        assert!(!features.is_matched("minibar"));
    }

    #[test]
    fn test_default_detail_has_no_breakdown() {
        let detail = MatchDetail::default();
        assert!(!detail.has_breakdown());
        assert!(detail.query_description.is_none());
    }

    #[test]
    fn test_field_match_serializes_match_key() {
        let field = FieldMatch {
            query: "double".to_string(),
            candidate: "double".to_string(),
            matched: true,
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["match"], true);
        assert_eq!(value["candidate"], "double");
    }
}
