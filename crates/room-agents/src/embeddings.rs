//! Remote text embeddings

use crate::client::OpenAiClient;
use search_core::{EmbeddingProvider, SearchError};
use std::sync::Arc;

/// [`EmbeddingProvider`] backed by the embeddings endpoint.
///
/// Every failure, including timeouts, surfaces as
/// [`SearchError::Embedding`] so the semantic channel can skip the text.
pub struct OpenAiEmbeddings {
    client: Arc<OpenAiClient>,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    fn embed(&self, text: &str) -> search_core::Result<Vec<f32>> {
        self.client
            .embedding(&self.model, text)
            .map_err(|e| SearchError::Embedding(e.to_string()))
    }
}
