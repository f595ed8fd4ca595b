//! Pluggable generative AI backend abstraction
//!
//! This module provides a backend-agnostic interface for text generation.
//! The advice generator only ever needs one thing from a backend: turn a
//! prompt into text, or report that no text came back.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`,
//!   `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, ollama, openai_compatible, mock). Default: gemini
//! - `GOOGLE_API_KEY`: Gemini API key (required for gemini backend)
//! - `GEMINI_MODEL`: Gemini model (default: gemini-1.5-pro)
//! - `GEMINI_BASE_URL`: Gemini API base URL (default: Google's public endpoint)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod gemini;
mod mock;
mod ollama;
mod openai_compatible;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockReply};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::config::AdvisorConfig;
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends make exactly one request per call and never retry.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate text for a prompt
    ///
    /// Returns `Ok(None)` when the service answered but produced no usable
    /// text, and `Err` for transport, auth, quota or decoding failures.
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;

    /// Describe the backend
    fn info(&self) -> BackendInfo;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini
    Gemini(GeminiBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use (default: gemini).
    /// Returns None if the backend's required variables (API key or host) are
    /// not set; credential checks belong to the caller.
    pub fn from_env(config: &AdvisorConfig) -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
        let model = config.model.as_deref();
        let timeout = config.timeout;

        match backend.parse::<BackendKind>() {
            Ok(BackendKind::Gemini) => GeminiBackend::from_env(model, timeout).map(AIClient::Gemini),
            Ok(BackendKind::Ollama) => OllamaBackend::from_env(model, timeout).map(AIClient::Ollama),
            Ok(BackendKind::OpenAICompatible) => {
                OpenAICompatibleBackend::from_env(model, timeout).map(AIClient::OpenAICompatible)
            }
            Ok(BackendKind::Mock) => Some(AIClient::Mock(MockBackend::new())),
            Err(_) => {
                warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env(model, timeout).map(AIClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            AIClient::Gemini(_) => BackendKind::Gemini,
            AIClient::Ollama(_) => BackendKind::Ollama,
            AIClient::OpenAICompatible(_) => BackendKind::OpenAICompatible,
            AIClient::Mock(_) => BackendKind::Mock,
        }
    }

    /// Environment variable that must be set for the selected backend
    pub fn required_env(kind: BackendKind) -> Option<&'static str> {
        match kind {
            BackendKind::Gemini => Some("GOOGLE_API_KEY"),
            BackendKind::Ollama => Some("OLLAMA_HOST"),
            BackendKind::OpenAICompatible => Some("OPENAI_COMPATIBLE_HOST"),
            BackendKind::Mock => None,
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        match self {
            AIClient::Gemini(b) => b.generate(system, prompt).await,
            AIClient::Ollama(b) => b.generate(system, prompt).await,
            AIClient::OpenAICompatible(b) => b.generate(system, prompt).await,
            AIClient::Mock(b) => b.generate(system, prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }

    fn info(&self) -> BackendInfo {
        match self {
            AIClient::Gemini(b) => b.info(),
            AIClient::Ollama(b) => b.info(),
            AIClient::OpenAICompatible(b) => b.info(),
            AIClient::Mock(b) => b.info(),
        }
    }
}

/// Build an HTTP client with an optional request timeout
pub(crate) fn http_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build HTTP client, using defaults");
        Client::new()
    })
}

/// First non-blank environment variable value
pub(crate) fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
