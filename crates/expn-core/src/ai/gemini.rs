//! Google Gemini backend implementation
//!
//! Calls the `generateContent` REST endpoint:
//! `POST {base}/v1beta/models/{model}:generateContent`
//!
//! # Configuration
//!
//! Environment variables:
//! - `GOOGLE_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-pro)
//! - `GEMINI_BASE_URL`: API base URL (default: https://generativelanguage.googleapis.com)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::types::{BackendInfo, BackendKind};
use super::{env_non_empty, http_client, AIBackend};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend against the public Gemini endpoint
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(DEFAULT_GEMINI_BASE_URL, api_key, model)
    }

    /// Create a backend against a custom base URL (proxies, test servers)
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: http_client(None),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Bound every request by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = http_client(Some(timeout));
        self
    }

    /// Create from environment variables
    ///
    /// Returns None when `GOOGLE_API_KEY` is unset. `GEMINI_MODEL` wins over
    /// `model`, which wins over the built-in default.
    pub fn from_env(model: Option<&str>, timeout: Duration) -> Option<Self> {
        let api_key = env_non_empty("GOOGLE_API_KEY")?;
        let model = env_non_empty("GEMINI_MODEL")
            .or_else(|| model.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            env_non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

        Some(Self::with_base_url(&base_url, &api_key, &model).with_timeout(timeout))
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model)
    }
}

/// Request body for generateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Response body from generateContent
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// Concatenated text of the first candidate, or None if there is none
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!(reason, "Gemini blocked the prompt");
    }

    let candidate = response.candidates.into_iter().next()?;
    if let Some(ref reason) = candidate.finish_reason {
        debug!(finish_reason = %reason, "Gemini candidate finished");
    }

    let text: String = candidate
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![text_content(Some("user"), prompt)],
            system_instruction: system.map(|s| text_content(None, s)),
        };

        let response = self
            .http_client
            .post(format!("{}:generateContent", self.model_url()))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "Gemini API error {}: {}",
                status,
                body.trim()
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        debug!(candidates = body.candidates.len(), "Gemini response");

        Ok(extract_text(body))
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.model_url())
            .header("x-goog-api-key", &self.api_key)
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
            kind: BackendKind::Gemini,
            model: self.model.clone(),
            host: self.base_url.clone(),
        }
    }
}
