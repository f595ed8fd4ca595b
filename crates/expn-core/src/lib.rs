//! Expn Core Library
//!
//! Shared functionality for the Expn budget assistant:
//! - Expense profiles and currency formatting
//! - Knowledge base of canned budgeting answers
//! - Question matching (token containment or fuzzy ratio)
//! - Pluggable generative AI backends (Gemini, Ollama, OpenAI-compatible)
//! - Prompt library for customizable AI prompts
//! - Advisor composing canned answers with AI fallback

pub mod advisor;
pub mod ai;
pub mod config;
pub mod error;
pub mod generator;
pub mod knowledge;
pub mod matcher;
pub mod profile;
pub mod prompts;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{AdviceFailure, AdviceResult, AdviceSource, Advisor};
pub use ai::{
    AIBackend, AIClient, BackendInfo, BackendKind, GeminiBackend, MockBackend, MockReply,
    OllamaBackend, OpenAICompatibleBackend,
};
pub use config::AdvisorConfig;
pub use error::{Error, Result};
pub use generator::{AdviceGenerator, GenerationOutcome};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use matcher::{KnowledgeMatch, MatchPolicy, Matcher};
pub use profile::{Category, ExpenseProfile};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
