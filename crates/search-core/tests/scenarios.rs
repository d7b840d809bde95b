//! End-to-end ranking scenarios over a small hotel corpus

use pretty_assertions::assert_eq;
use room_types::{Corpus, StructuredQuery};
use search_core::{
    explain_query, EmbeddingProvider, HashEmbedder, HybridRanker, ResultPresenter, SearchConfig,
    SearchError,
};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const CORPUS_JSON: &str = r#"{
    "image1.jpg": {
        "room_type": "double",
        "max_capacity": 2,
        "view_type": "sea view",
        "features": ["private balcony", "air conditioning", "flat-screen TV"],
        "description": "Spacious double room with a beautiful sea view and a private balcony. The room has air conditioning, a flat-screen TV, and a comfortable queen-sized bed."
    },
    "image2.jpg": {
        "room_type": "double",
        "max_capacity": 2,
        "view_type": "garden view",
        "features": ["balcony", "air conditioning", "desk"],
        "description": "Double room overlooking the garden with a balcony and desk. Well-equipped with air conditioning and a working area."
    },
    "image3.jpg": {
        "room_type": "single",
        "max_capacity": 1,
        "view_type": "sea view",
        "features": ["balcony", "air conditioning"],
        "description": "Comfortable single room with sea view and essential amenities including a balcony and air conditioning."
    },
    "image4.jpg": {
        "room_type": "double",
        "max_capacity": 3,
        "view_type": "mountain view",
        "features": ["balcony", "air conditioning", "sofa bed"],
        "description": "Spacious room with a sofa bed and mountain views. Features a balcony and air conditioning."
    },
    "image5.jpg": {
        "room_type": "suite",
        "max_capacity": 4,
        "view_type": "sea view",
        "features": ["balcony", "air conditioning", "kitchenette", "living area"],
        "description": "Luxury suite with a separate living area and kitchenette. Offers sea views from a large balcony and air conditioning throughout."
    }
}"#;

fn corpus() -> anyhow::Result<Corpus> {
    Ok(serde_json::from_str(CORPUS_JSON)?)
}

fn sea_view_query() -> anyhow::Result<StructuredQuery> {
    Ok(serde_json::from_str(
        r#"{
            "room_type": "double",
            "max_capacity": 2,
            "view_type": "sea view",
            "features": ["balcony", "air conditioning"],
            "description": "Double room with sea view, balcony, and air conditioning."
        }"#,
    )?)
}

/// Embeds by keyword presence, so similarity is predictable.
struct KeywordProvider;

impl EmbeddingProvider for KeywordProvider {
    fn embed(&self, text: &str) -> search_core::Result<Vec<f32>> {
        let text = text.to_lowercase();
        let vector: Vec<f32> = ["sea", "garden", "mountain", "suite"]
            .iter()
            .map(|word| if text.contains(word) { 1.0 } else { 0.0 })
            .collect();
        if vector.iter().all(|x| *x == 0.0) {
            return Err(SearchError::Embedding(format!("nothing to embed in {:?}", text)));
        }
        Ok(vector)
    }
}

#[test]
fn keyword_only_ranking() -> anyhow::Result<()> {
    init_tracing();
    let config = SearchConfig::default()
        .with_weights(0.6, 0.4)
        // no similarity can reach 2.0
        .with_min_scores(0.3, 2.0);
    let ranker = HybridRanker::new(HashEmbedder::default(), config)?;

    let results = ranker.rank(&sea_view_query()?, &corpus()?);
    let ranked: Vec<(&str, f32)> = results
        .iter()
        .map(|r| (r.id.as_str(), r.detail.keyword_score))
        .collect();

    assert_eq!(
        ranked,
        vec![
            ("image1.jpg", 1.0),
            ("image2.jpg", 0.8),
            ("image4.jpg", 0.8),
            ("image5.jpg", 0.8),
            ("image3.jpg", 0.6),
        ]
    );
    assert!((results[0].combined_score - 0.6).abs() < 1e-6);
    Ok(())
}

#[test]
fn semantic_channel_lifts_matching_descriptions() -> anyhow::Result<()> {
    init_tracing();
    let config = SearchConfig::default().with_weights(0.6, 0.4).with_max_results(3);
    let ranker = HybridRanker::new(KeywordProvider, config)?;

    let results = ranker.rank(&sea_view_query()?, &corpus()?);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();

    // image3 misses room type and capacity but its description outranks
    // the garden and mountain rooms
    assert_eq!(ids, vec!["image1.jpg", "image5.jpg", "image3.jpg"]);
    assert!((results[0].combined_score - 1.0).abs() < 1e-6);
    assert!((results[2].detail.keyword_score - 0.6).abs() < 1e-6);
    assert!((results[2].detail.semantic_score - 1.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn semantic_only_candidates_join_the_union() -> anyhow::Result<()> {
    init_tracing();
    let query = StructuredQuery {
        room_type: "penthouse".to_string(),
        description: "Something by the sea".to_string(),
        ..Default::default()
    };
    let ranker = HybridRanker::new(KeywordProvider, SearchConfig::default())?;

    let results = ranker.rank(&query, &corpus()?);
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();

    // image5 mentions both the sea and a suite, so it sits at cos = 1/sqrt(2)
    assert_eq!(ids, vec!["image1.jpg", "image3.jpg", "image5.jpg"]);
    assert!(results.iter().all(|r| !r.detail.has_breakdown()));
    assert!((results[0].combined_score - 0.3).abs() < 1e-6);
    assert!((results[2].detail.semantic_score - 0.5f32.sqrt()).abs() < 1e-5);
    Ok(())
}

#[test]
fn ranking_renders_for_both_front_ends() -> anyhow::Result<()> {
    init_tracing();
    let corpus = corpus()?;
    let query = sea_view_query()?;
    let ranker = HybridRanker::new(KeywordProvider, SearchConfig::default())?;
    let results = ranker.rank(&query, &corpus);

    let presenter = ResultPresenter::new();
    let report = presenter.present(&results, &corpus);
    assert_eq!(report.count, results.len());
    assert_eq!(report.results[0].id, "image1.jpg");
    assert_eq!(report.results[0].combined_score, 100);
    assert_eq!(report.results[0].matches.view_type, Some(true));

    let text = presenter.format_text(&results, &corpus);
    assert!(text.starts_with(&format!("Found {} matching rooms:", results.len())));
    assert!(text.contains("Match #1: image1.jpg"));
    assert!(text.contains("View: ✓ Query: 'sea view', Found: 'sea view'"));

    let explanation = explain_query(&query);
    assert!(explanation.contains("- Maximum capacity: 2 people"));
    assert!(explanation.contains("- Features: balcony, air conditioning"));
    Ok(())
}

#[test]
fn embeddings_are_reused_across_searches() -> anyhow::Result<()> {
    let corpus = corpus()?;
    let query = sea_view_query()?;
    let ranker = HybridRanker::new(HashEmbedder::default(), SearchConfig::default())?;

    let first = ranker.rank(&query, &corpus);
    let misses = ranker.scorer().cache().stats().misses;
    let second = ranker.rank(&query, &corpus);

    assert_eq!(first, second);
    assert_eq!(ranker.scorer().cache().stats().misses, misses);
    // query description plus five room descriptions
    assert_eq!(ranker.scorer().cache().len(), 6);
    Ok(())
}
