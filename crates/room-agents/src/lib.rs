//! Room Agents - Model-backed collaborators for hotel room search
//!
//! This crate provides:
//! - A single HTTP handle for an OpenAI-compatible API
//! - Free-text query parsing into structured queries
//! - Room image analysis into candidate records
//! - Remote text embeddings for the semantic channel
//!
//! Parsers and analyzers never fail outright: errors are logged and turned
//! into sentinel records so a search can always proceed.

pub mod client;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod query;
pub mod vision;

pub use client::OpenAiClient;
pub use config::AgentConfig;
pub use embeddings::OpenAiEmbeddings;
pub use error::{AgentError, Result};
pub use query::{LlmQueryParser, QueryParser};
pub use vision::{RoomAnalyzer, VisionRoomAnalyzer};
