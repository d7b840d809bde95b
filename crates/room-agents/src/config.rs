//! Collaborator configuration

use crate::error::{AgentError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Connection and model settings for the OpenAI-compatible API
#[derive(Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub chat_model: String,
    pub vision_model: String,
    pub embedding_model: String,
}

// Keep the key out of logs
impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("chat_model", &self.chat_model)
            .field("vision_model", &self.vision_model)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

impl AgentConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load configuration from the environment, reading `.env` first if present
    ///
    /// Expected variables:
    /// - OPENAI_API_KEY: required
    /// - OPENAI_BASE_URL: defaults to the public OpenAI endpoint
    /// - ROOM_AGENTS_TIMEOUT_SECS: per-request timeout
    /// - ROOM_AGENTS_CHAT_MODEL, ROOM_AGENTS_VISION_MODEL,
    ///   ROOM_AGENTS_EMBEDDING_MODEL: model overrides
    pub fn from_env() -> Result<Self> {
        // A missing .env file is normal
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(AgentError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(raw) = lookup("ROOM_AGENTS_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                AgentError::InvalidConfig(format!(
                    "ROOM_AGENTS_TIMEOUT_SECS has an invalid value: {:?}",
                    raw
                ))
            })?;
            config.timeout_secs = secs;
        }

        if let Some(model) = lookup("ROOM_AGENTS_CHAT_MODEL") {
            config.chat_model = model;
        }
        if let Some(model) = lookup("ROOM_AGENTS_VISION_MODEL") {
            config.vision_model = model;
        }
        if let Some(model) = lookup("ROOM_AGENTS_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        Ok(config)
    }
}
