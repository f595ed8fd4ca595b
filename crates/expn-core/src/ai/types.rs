//! AI backend descriptor types
//!
//! These types are backend-agnostic and used across all AI implementations.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which generative service a client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Google Gemini `generateContent` API
    Gemini,
    /// Ollama `/api/generate`
    Ollama,
    /// Any server implementing `/v1/chat/completions`
    OpenAICompatible,
    /// Scripted responses for tests
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::OpenAICompatible => "openai_compatible",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                Ok(Self::OpenAICompatible)
            }
            "mock" => Ok(Self::Mock),
            other => Err(format!("Unknown AI backend: {}", other)),
        }
    }
}

/// Backend description for status output
#[derive(Debug, Clone, Serialize)]
pub struct BackendInfo {
    pub kind: BackendKind,
    pub model: String,
    pub host: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("Gemini".parse::<BackendKind>(), Ok(BackendKind::Gemini));
        assert_eq!("vllm".parse::<BackendKind>(), Ok(BackendKind::OpenAICompatible));
        assert_eq!("mock".parse::<BackendKind>(), Ok(BackendKind::Mock));
        assert!("bard".parse::<BackendKind>().is_err());
    }
}
