//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//! - Docker Model Runner (http://localhost:12434)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::types::{BackendInfo, BackendKind};
use super::{env_non_empty, http_client, AIBackend};

pub const DEFAULT_OPENAI_COMPATIBLE_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: http_client(None),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(Some(timeout));
        self
    }

    /// Create from environment variables
    ///
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (wins over `model`), `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env(model: Option<&str>, timeout: Duration) -> Option<Self> {
        let host = env_non_empty("OPENAI_COMPATIBLE_HOST")?;
        let model = env_non_empty("OPENAI_COMPATIBLE_MODEL")
            .or_else(|| model.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_OPENAI_COMPATIBLE_MODEL.to_string());

        let mut backend = Self::new(&host, &model).with_timeout(timeout);
        backend.api_key = env_non_empty("OPENAI_COMPATIBLE_API_KEY");
        Some(backend)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_messages<'a>(system: Option<&'a str>, prompt: &'a str) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

fn extract_text(response: ChatCompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(system, prompt),
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "OpenAI API error {}: {}",
                status,
                body.trim()
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;
        debug!(choices = chat_response.choices.len(), "Chat completion response");

        Ok(extract_text(chat_response))
    }

    async fn health_check(&self) -> bool {
        let mut req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url));

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        match req_builder.send().await {
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
            kind: BackendKind::OpenAICompatible,
            model: self.model.clone(),
            host: self.base_url.clone(),
        }
    }
}
