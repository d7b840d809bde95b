//! Free-text room requests to structured queries

use crate::client::OpenAiClient;
use crate::error::Result;
use room_types::StructuredQuery;
use serde_json::json;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = r#"You are a hotel-room search assistant.
Return exactly one JSON object with these fields and allowed values:

{
"room_type":    "single | double | twin | suite | family room | studio | luxury suite | \"\"",
"max_capacity": integer or null,
"view_type":    "sea | city | garden | mountain | pool | street | none | \"\"",
"features":     ["any feature explicitly mentioned by the user", ...],
"description":  "concise summary (<70 words) using only requested fields"
}

Rules:
- ONLY include fields the user explicitly mentioned.
- If the user omits a field, set defaults: room_type="standard", max_capacity=2, view_type="standard".
- For fields the user did not mention at all you may also use "" (strings), null (integers) or [] (lists).
- The features array must list only the exact amenities the user named; do not invent extras.
- The description should be under 50 words, mention exactly the desired features and avoid embellishment.
- Return only the JSON object, no extra text."#;

/// Turns a user's free-text request into a [`StructuredQuery`].
///
/// Never fails: implementations return [`fallback_query`] when parsing is
/// impossible.
pub trait QueryParser {
    fn process_query(&self, user_query: &str) -> StructuredQuery;
}

/// Query used when the request could not be parsed: wildcard room and view,
/// two guests, and the failure reason as the description.
pub fn fallback_query(reason: impl Display) -> StructuredQuery {
    StructuredQuery {
        room_type: "any".to_string(),
        max_capacity: Some(2),
        view_type: "any".to_string(),
        features: Vec::new(),
        description: format!("Error processing query: {}", reason),
    }
}

/// [`QueryParser`] backed by a chat model in JSON mode
pub struct LlmQueryParser {
    client: Arc<OpenAiClient>,
    model: String,
}

impl LlmQueryParser {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Parse without the fallback.
    pub fn try_process(&self, user_query: &str) -> Result<StructuredQuery> {
        let messages = [
            json!({"role": "system", "content": SYSTEM_PROMPT}),
            json!({"role": "user", "content": user_query}),
        ];
        let query: StructuredQuery = self.client.chat_as(&self.model, &messages)?;
        debug!("Parsed query: {:?}", query);
        Ok(query)
    }
}

impl QueryParser for LlmQueryParser {
    fn process_query(&self, user_query: &str) -> StructuredQuery {
        self.try_process(user_query).unwrap_or_else(|e| {
            warn!("Error processing query: {}", e);
            fallback_query(e)
        })
    }
}
