//! Presentation of ranked results
//!
//! Two renderings of the same ranking: a serializable [`SearchReport`] for
//! web front ends and a plain-text report for terminals and logs.

use crate::error::Result;
use room_types::{CandidateRecord, Corpus, ScoredCandidate, StructuredQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const NOT_SPECIFIED: &str = "not specified";

/// Feature outcome as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMatches {
    pub query: Vec<String>,
    pub matches: Vec<String>,
}

/// Match flags for the fields the query actively constrained.
///
/// Inactive fields are omitted from the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatches {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureMatches>,
}

/// One result row, scores scaled to whole percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoom {
    /// 1-based position in the ranking
    pub rank: usize,
    pub id: String,
    /// Image reference the front end links to; same value as `id`
    pub url: String,
    /// Image reference the front end renders; same value as `id`
    pub image_url: String,
    pub combined_score: i32,
    pub keyword_score: i32,
    pub semantic_score: i32,
    pub room_type: String,
    pub max_capacity: u32,
    pub view_type: String,
    pub features: Vec<String>,
    pub description: String,
    pub query_description: String,
    pub matches: FieldMatches,
}

/// Ranked results ready for a front end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub count: usize,
    pub results: Vec<RankedRoom>,
}

impl SearchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Renders ranked results for display
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter;

impl ResultPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Build the structured report.
    ///
    /// Candidate fields come from `corpus`; a result whose id is missing from
    /// the corpus shows placeholder values.
    pub fn present(&self, results: &[ScoredCandidate], corpus: &Corpus) -> SearchReport {
        let results: Vec<RankedRoom> = results
            .iter()
            .enumerate()
            .map(|(i, result)| Self::ranked_room(i + 1, result, corpus.get(&result.id)))
            .collect();

        SearchReport {
            count: results.len(),
            results,
        }
    }

    /// Render a human-readable report.
    pub fn format_text(&self, results: &[ScoredCandidate], corpus: &Corpus) -> String {
        TextReport { results, corpus }.to_string()
    }

    fn ranked_room(rank: usize, result: &ScoredCandidate, record: Option<&CandidateRecord>) -> RankedRoom {
        let detail = &result.detail;
        let record = record.cloned().unwrap_or_default();
        let max_capacity = record.capacity();

        let matches = FieldMatches {
            room_type: detail.room_type.as_ref().map(|f| f.matched),
            max_capacity: detail.max_capacity.as_ref().map(|f| f.matched),
            view_type: detail.view_type.as_ref().map(|f| f.matched),
            features: detail.features.as_ref().map(|f| FeatureMatches {
                query: f.query.clone(),
                matches: f.matches.clone(),
            }),
        };

        RankedRoom {
            rank,
            id: result.id.clone(),
            url: result.id.clone(),
            image_url: result.id.clone(),
            combined_score: percent(result.combined_score),
            keyword_score: percent(detail.keyword_score),
            semantic_score: percent(detail.semantic_score),
            room_type: or_unknown(record.room_type),
            max_capacity,
            view_type: or_unknown(record.view_type),
            features: record.features,
            description: record.description,
            query_description: detail.query_description.clone().unwrap_or_default(),
            matches,
        }
    }
}

/// Plain-text rendering of a ranking
struct TextReport<'a> {
    results: &'a [ScoredCandidate],
    corpus: &'a Corpus,
}

impl TextReport<'_> {
    fn write_match(&self, f: &mut fmt::Formatter<'_>, position: usize, result: &ScoredCandidate) -> fmt::Result {
        let detail = &result.detail;
        writeln!(f, "Match #{}: {}", position, result.id)?;
        writeln!(f, "Combined Score: {:.2}", result.combined_score)?;
        writeln!(f, "Keyword Score: {:.2}", detail.keyword_score)?;
        writeln!(f, "Semantic Score: {:.2}", detail.semantic_score)?;

        if let Some(field) = &detail.room_type {
            writeln!(
                f,
                "Room Type: {} Query: '{}', Found: '{}'",
                check_mark(field.matched),
                field.query,
                field.candidate
            )?;
        }
        if let Some(field) = &detail.max_capacity {
            writeln!(
                f,
                "Capacity: {} Query: {}, Found: {}",
                check_mark(field.matched),
                field.query,
                field.candidate
            )?;
        }
        if let Some(field) = &detail.view_type {
            writeln!(
                f,
                "View: {} Query: '{}', Found: '{}'",
                check_mark(field.matched),
                field.query,
                field.candidate
            )?;
        }
        if let Some(features) = &detail.features {
            writeln!(
                f,
                "Features ({}/{}):",
                features.matches.len(),
                features.query.len()
            )?;
            for wanted in &features.query {
                writeln!(f, "  {} {}", check_mark(features.is_matched(wanted)), wanted)?;
            }
            writeln!(f, "Found in room: {}", features.candidate.join(", "))?;
        }

        let query_description = detail
            .query_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(NOT_AVAILABLE);
        let room_description = self
            .corpus
            .get(&result.id)
            .map(|record| record.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(NOT_AVAILABLE);

        writeln!(f, "Query Description: \"{}\"", query_description)?;
        writeln!(f, "Room Description: \"{}\"", room_description)?;
        writeln!(f)
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            return f.write_str("No matching rooms found.");
        }

        writeln!(f, "Found {} matching rooms:\n", self.results.len())?;
        for (i, result) in self.results.iter().enumerate() {
            self.write_match(f, i + 1, result)?;
        }
        Ok(())
    }
}

/// Describe a structured query as a bulleted list of criteria.
pub fn explain_query(query: &StructuredQuery) -> String {
    let room_type = non_empty_or(&query.room_type, NOT_SPECIFIED);
    let view_type = non_empty_or(&query.view_type, NOT_SPECIFIED);
    let features = if query.features.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        query.features.join(", ")
    };

    format!(
        "Search criteria:\n\
         - Room type: {}\n\
         - Maximum capacity: {} people\n\
         - View: {}\n\
         - Features: {}\n\
         \nDescription: {}",
        room_type,
        query.capacity(),
        view_type,
        features,
        query.description
    )
}

fn percent(score: f32) -> i32 {
    (score * 100.0).round() as i32
}

fn check_mark(matched: bool) -> &'static str {
    if matched {
        "✓"
    } else {
        "✗"
    }
}

fn or_unknown(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use room_types::{FeatureMatch, FieldMatch, MatchDetail};

    fn corpus() -> Corpus {
        [(
            "room1.jpg".to_string(),
            CandidateRecord {
                room_type: "double".to_string(),
                max_capacity: Some(2),
                view_type: "sea view".to_string(),
                features: vec!["private balcony".to_string(), "tv".to_string()],
                description: "Bright double room facing the sea.".to_string(),
            },
        )]
        .into_iter()
        .collect()
    }

    fn attribute_hit() -> ScoredCandidate {
        ScoredCandidate {
            id: "room1.jpg".to_string(),
            combined_score: 0.856,
            detail: MatchDetail {
                query_description: Some("Double room with sea view.".to_string()),
                room_type: Some(FieldMatch {
                    query: "double".to_string(),
                    candidate: "double".to_string(),
                    matched: true,
                }),
                max_capacity: Some(FieldMatch {
                    query: 3,
                    candidate: 2,
                    matched: false,
                }),
                view_type: None,
                features: Some(FeatureMatch {
                    query: vec!["balcony".to_string(), "minibar".to_string()],
                    candidate: vec!["private balcony".to_string(), "tv".to_string()],
                    matches: vec!["balcony".to_string()],
                }),
                keyword_score: 0.8,
                semantic_score: 0.92,
                combined_score: 0.856,
            },
        }
    }

    fn semantic_only_hit(id: &str) -> ScoredCandidate {
        ScoredCandidate {
            id: id.to_string(),
            combined_score: 0.21,
            detail: MatchDetail {
                semantic_score: 0.7,
                combined_score: 0.21,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_present_scales_and_copies_fields() {
        let report = ResultPresenter::new().present(&[attribute_hit()], &corpus());
        assert_eq!(report.count, 1);

        let room = &report.results[0];
        assert_eq!(room.rank, 1);
        assert_eq!(room.combined_score, 86);
        assert_eq!(room.keyword_score, 80);
        assert_eq!(room.semantic_score, 92);
        assert_eq!(room.room_type, "double");
        assert_eq!(room.max_capacity, 2);
        assert_eq!(room.query_description, "Double room with sea view.");
        assert_eq!(
            room.matches,
            FieldMatches {
                room_type: Some(true),
                max_capacity: Some(false),
                view_type: None,
                features: Some(FeatureMatches {
                    query: vec!["balcony".to_string(), "minibar".to_string()],
                    matches: vec!["balcony".to_string()],
                }),
            }
        );
    }

    #[test]
    fn test_present_unknown_candidate() {
        let report = ResultPresenter::new().present(&[semantic_only_hit("gone.jpg")], &corpus());
        let room = &report.results[0];

        assert_eq!(room.room_type, "Unknown");
        assert_eq!(room.view_type, "Unknown");
        assert_eq!(room.max_capacity, 0);
        assert_eq!(room.description, "");
        assert_eq!(room.query_description, "");
        assert_eq!(room.matches, FieldMatches::default());
    }

    #[test]
    fn test_report_json_omits_inactive_fields() {
        let report = ResultPresenter::new().present(&[attribute_hit()], &corpus());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let matches = &value["results"][0]["matches"];
        assert_eq!(matches["room_type"], true);
        assert!(matches.get("view_type").is_none());
        assert_eq!(matches["features"]["matches"][0], "balcony");
        assert_eq!(value["count"], 1);
    }

    #[test]
    fn test_report_json_exposes_image_url() {
        let report = ResultPresenter::new().present(&[attribute_hit()], &corpus());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let room = &value["results"][0];
        assert_eq!(room["id"], "room1.jpg");
        assert_eq!(room["url"], "room1.jpg");
        assert_eq!(room["image_url"], "room1.jpg");
    }

    #[test]
    fn test_format_text_empty() {
        let text = ResultPresenter::new().format_text(&[], &corpus());
        assert_eq!(text, "No matching rooms found.");
    }

    #[test]
    fn test_format_text_lines() {
        let text = ResultPresenter::new().format_text(&[attribute_hit()], &corpus());

        assert!(text.starts_with("Found 1 matching rooms:\n\n"));
        assert!(text.contains("Match #1: room1.jpg\n"));
        assert!(text.contains("Combined Score: 0.86\n"));
        assert!(text.contains("Room Type: ✓ Query: 'double', Found: 'double'\n"));
        assert!(text.contains("Capacity: ✗ Query: 3, Found: 2\n"));
        assert!(!text.contains("View:"));
        assert!(text.contains("Features (1/2):\n  ✓ balcony\n  ✗ minibar\n"));
        assert!(text.contains("Found in room: private balcony, tv\n"));
        assert!(text.contains("Room Description: \"Bright double room facing the sea.\"\n"));
    }

    #[test]
    fn test_format_text_full_block() {
        let text = ResultPresenter::new().format_text(&[attribute_hit()], &corpus());
        assert_eq!(
            text,
            "Found 1 matching rooms:\n\n\
             Match #1: room1.jpg\n\
             Combined Score: 0.86\n\
             Keyword Score: 0.80\n\
             Semantic Score: 0.92\n\
             Room Type: ✓ Query: 'double', Found: 'double'\n\
             Capacity: ✗ Query: 3, Found: 2\n\
             Features (1/2):\n  \
             ✓ balcony\n  \
             ✗ minibar\n\
             Found in room: private balcony, tv\n\
             Query Description: \"Double room with sea view.\"\n\
             Room Description: \"Bright double room facing the sea.\"\n\n"
        );
    }

    #[test]
    fn test_format_text_placeholders() {
        let text = ResultPresenter::new().format_text(&[semantic_only_hit("gone.jpg")], &corpus());
        assert!(text.contains("Query Description: \"N/A\"\n"));
        assert!(text.contains("Room Description: \"N/A\"\n"));
        assert!(!text.contains("Room Type:"));
    }

    #[test]
    fn test_explain_query() {
        let query = StructuredQuery {
            room_type: "suite".to_string(),
            max_capacity: Some(4),
            view_type: String::new(),
            features: vec![],
            description: "Family suite.".to_string(),
        };
        assert_eq!(
            explain_query(&query),
            "Search criteria:\n\
             - Room type: suite\n\
             - Maximum capacity: 4 people\n\
             - View: not specified\n\
             - Features: not specified\n\
             \nDescription: Family suite."
        );
    }
}
