//! HTTP handle for an OpenAI-compatible API
//!
//! One [`OpenAiClient`] is built per process and shared (behind an `Arc`)
//! by every collaborator, so connection pooling and the request timeout are
//! configured in one place.

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Value],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion in JSON-object mode and return the raw message
    /// content.
    pub fn chat_json(&self, model: &str, messages: &[Value]) -> Result<String> {
        let request = ChatRequest {
            model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response: ChatResponse = self.post("chat/completions", &request)?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AgentError::EmptyResponse)
    }

    /// Run a chat completion and parse the message content as `T`.
    pub fn chat_as<T: DeserializeOwned>(&self, model: &str, messages: &[Value]) -> Result<T> {
        let content = self.chat_json(model, messages)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Embed one text.
    pub fn embedding(&self, model: &str, input: &str) -> Result<Vec<f32>> {
        let response: EmbeddingResponse =
            self.post("embeddings", &EmbeddingRequest { model, input })?;
        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or(AgentError::EmptyResponse)
    }

    /// Download raw bytes from an arbitrary URL, without API credentials.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = check_status(self.http.get(url).send()?)?;
        Ok(response.bytes()?.to_vec())
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()?;

        Ok(check_status(response)?.json()?)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(AgentError::Api {
        status: status.as_u16(),
        body,
    })
}
