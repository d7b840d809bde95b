//! Room image analysis
//!
//! Images are referenced by URL (`http://` or `https://`) or by local path.
//! Either way the bytes are sent inline as a base64 data URL, so the model
//! never needs access to the image host.

use crate::client::OpenAiClient;
use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use room_types::{CandidateRecord, Corpus};
use serde_json::json;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = r#"You are an AI specialized in analyzing hotel room images.
Return exactly one JSON object with these fields and possible values:

{
"room_type":    "single | double | twin | suite | family room | studio | luxury suite | \"\"",
"max_capacity": integer or null,
"view_type":    "sea | city | garden | mountain | pool | none | \"\"",
"features":     ["any visible feature as a string", ...],
"description":  "A brief paragraph describing the room and visible features."
}

Rules:
- List every feature you can visually confirm in the image; do not restrict to a predefined list.
- Fill only fields you can actually see.
- If you cannot confirm a field, use "" for strings, [] for lists and null for integers.
- The description must mention room type, capacity, view (if any), and summarize the visible features in one or two sentences.
- Do not guess or invent anything not visible.
- Return only the JSON object, no extra text."#;

const USER_PROMPT: &str = "Analyze this hotel room image and provide a detailed description.";

/// Describes one room image as a [`CandidateRecord`].
///
/// Never fails: implementations return [`fallback_record`] for images that
/// cannot be loaded or analyzed.
pub trait RoomAnalyzer {
    fn analyze(&self, image_ref: &str) -> CandidateRecord;

    /// Analyze every image, keyed by its reference.
    fn analyze_all<S: AsRef<str>>(&self, image_refs: &[S]) -> Corpus
    where
        Self: Sized,
    {
        let corpus: Corpus = image_refs
            .iter()
            .map(|image_ref| {
                let image_ref = image_ref.as_ref();
                (image_ref.to_string(), self.analyze(image_ref))
            })
            .collect();
        info!("Analyzed {} room images", corpus.len());
        corpus
    }
}

/// Record used for an image that could not be analyzed.
pub fn fallback_record(reason: impl Display) -> CandidateRecord {
    CandidateRecord {
        room_type: "unknown".to_string(),
        max_capacity: Some(0),
        view_type: "unknown".to_string(),
        features: Vec::new(),
        description: format!("Failed to analyze image: {}", reason),
    }
}

fn is_remote(image_ref: &str) -> bool {
    image_ref.starts_with("http://") || image_ref.starts_with("https://")
}

/// [`RoomAnalyzer`] backed by a vision-capable chat model
pub struct VisionRoomAnalyzer {
    client: Arc<OpenAiClient>,
    model: String,
}

impl VisionRoomAnalyzer {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Analyze without the fallback.
    pub fn try_analyze(&self, image_ref: &str) -> Result<CandidateRecord> {
        let image = self.load_image(image_ref)?;
        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(&image));

        let messages = [
            json!({"role": "system", "content": SYSTEM_PROMPT}),
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": USER_PROMPT},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]
            }),
        ];

        self.client.chat_as(&self.model, &messages)
    }

    fn load_image(&self, image_ref: &str) -> Result<Vec<u8>> {
        if is_remote(image_ref) {
            self.client.fetch_bytes(image_ref)
        } else {
            Ok(std::fs::read(Path::new(image_ref))?)
        }
    }
}

impl RoomAnalyzer for VisionRoomAnalyzer {
    fn analyze(&self, image_ref: &str) -> CandidateRecord {
        self.try_analyze(image_ref).unwrap_or_else(|e| {
            warn!("Error analyzing image {}: {}", image_ref, e);
            fallback_record(e)
        })
    }
}
