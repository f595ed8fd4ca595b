//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint. Useful for running
//! the advisor against a local model instead of Gemini.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{BackendInfo, BackendKind};
use super::{env_non_empty, http_client, AIBackend};

pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: http_client(None),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(Some(timeout));
        self
    }

    /// Create from environment variables
    ///
    /// Requires `OLLAMA_HOST`; `OLLAMA_MODEL` wins over `model`.
    pub fn from_env(model: Option<&str>, timeout: Duration) -> Option<Self> {
        let host = env_non_empty("OLLAMA_HOST")?;
        let model = env_non_empty("OLLAMA_MODEL")
            .or_else(|| model.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        Some(Self::new(&host, &model).with_timeout(timeout))
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

fn extract_text(response: OllamaResponse) -> Option<String> {
    if response.response.trim().is_empty() {
        None
    } else {
        Some(response.response)
    }
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        let request = OllamaRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "Ollama error {}: {}",
                status,
                body.trim()
            )));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);

        Ok(extract_text(ollama_response))
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: BackendKind::Ollama,
            model: self.model.clone(),
            host: self.base_url.clone(),
        }
    }
}
