//! Mock backend for testing
//!
//! Returns a scripted outcome for every generate call and records the
//! prompts it was given. Useful for unit tests and for running the CLI
//! without a reachable model (`AI_BACKEND=mock`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{BackendInfo, BackendKind};
use super::AIBackend;

/// What the mock returns from `generate`
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with this text
    Text(String),
    /// Succeed with no usable text
    Empty,
    /// Fail with a service error carrying this detail
    Fail(String),
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Healthy mock that gives generic budgeting advice
    pub fn new() -> Self {
        Self::with_reply(MockReply::Text(
            "Track every expense for a month, then trim the largest discretionary category first."
                .to_string(),
        ))
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            healthy: true,
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_reply(MockReply::Text(text.to_string()))
    }

    pub fn empty() -> Self {
        Self::with_reply(MockReply::Empty)
    }

    pub fn failing(detail: &str) -> Self {
        Self::with_reply(MockReply::Fail(detail.to_string()))
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Prompts passed to `generate`, oldest first (shared across clones)
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, _system: Option<&str>, prompt: &str) -> Result<Option<String>> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            MockReply::Text(text) => Ok(Some(text.clone())),
            MockReply::Empty => Ok(None),
            MockReply::Fail(detail) => Err(Error::Service(detail.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: BackendKind::Mock,
            model: "mock".to_string(),
            host: "mock://localhost".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replies() {
        let mock = MockBackend::replying("Cook at home.");
        assert_eq!(
            mock.generate(None, "p").await.unwrap().as_deref(),
            Some("Cook at home.")
        );

        assert_eq!(MockBackend::empty().generate(None, "p").await.unwrap(), None);

        let err = MockBackend::failing("quota exceeded")
            .generate(None, "p")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_mock_records_prompts_across_clones() {
        let mock = MockBackend::new();
        let clone = mock.clone();

        clone.generate(Some("sys"), "first").await.unwrap();
        clone.generate(None, "second").await.unwrap();

        assert_eq!(mock.prompts(), vec!["first", "second"]);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let healthy = MockBackend::new();
        assert!(healthy.health_check().await);

        let unhealthy = MockBackend::unhealthy();
        assert!(!unhealthy.health_check().await);
    }
}
