//! Advisor: knowledge base first, AI fallback second
//!
//! Composes the matcher and the generator the way the UI uses them:
//! - a question is answered from the knowledge base when it matches, and
//!   otherwise sent to the generator with the question as extra context;
//! - an explicit advice request skips the knowledge base entirely.
//!
//! Every call produces exactly one [`AdviceResult`].

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::ai::AIBackend;
use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::generator::{AdviceGenerator, GenerationOutcome};
use crate::knowledge::KnowledgeBase;
use crate::matcher::{MatchPolicy, Matcher};
use crate::profile::ExpenseProfile;
use crate::prompts::PromptLibrary;

/// Prefix on user-visible service error text
pub const ERROR_MARKER: &str = "⚠️";

/// Prefix on user-visible empty-response text
pub const NOTICE_MARKER: &str = "ℹ️";

/// Which path produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Canned,
    Generated,
    Error,
}

impl AdviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Canned => "canned",
            Self::Generated => "generated",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AdviceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why generated advice is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceFailure {
    /// The AI call failed
    Service(String),
    /// The AI call returned nothing usable
    EmptyResponse,
}

/// Outcome of one advisor interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceResult {
    /// Answer from the knowledge base
    Canned(String),
    /// Text from the AI service
    Generated(String),
    /// The AI path failed
    Failed(AdviceFailure),
}

impl AdviceResult {
    pub fn source(&self) -> AdviceSource {
        match self {
            Self::Canned(_) => AdviceSource::Canned,
            Self::Generated(_) => AdviceSource::Generated,
            Self::Failed(_) => AdviceSource::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Text to show the user
    pub fn text(&self) -> String {
        match self {
            Self::Canned(text) | Self::Generated(text) => text.clone(),
            Self::Failed(AdviceFailure::Service(detail)) => {
                format!("{} Error getting AI advice: {}", ERROR_MARKER, detail)
            }
            Self::Failed(AdviceFailure::EmptyResponse) => format!(
                "{} The AI service returned no advice. Try rephrasing or adding more detail.",
                NOTICE_MARKER
            ),
        }
    }
}

impl From<GenerationOutcome> for AdviceResult {
    fn from(outcome: GenerationOutcome) -> Self {
        match outcome {
            GenerationOutcome::Succeeded(text) => Self::Generated(text),
            GenerationOutcome::ServiceError(detail) => Self::Failed(AdviceFailure::Service(detail)),
            GenerationOutcome::EmptyResponse => Self::Failed(AdviceFailure::EmptyResponse),
        }
    }
}

impl Serialize for AdviceResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("AdviceResult", 3)?;
        state.serialize_field("source", &self.source())?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("text", &self.text())?;
        state.end()
    }
}

/// Knowledge base plus generator, configured once at startup
pub struct Advisor<B> {
    knowledge: KnowledgeBase,
    policy: MatchPolicy,
    generator: AdviceGenerator<B>,
}

impl<B: AIBackend> Advisor<B> {
    pub fn new(knowledge: KnowledgeBase, policy: MatchPolicy, generator: AdviceGenerator<B>) -> Self {
        Self {
            knowledge,
            policy,
            generator,
        }
    }

    /// Assemble an advisor from loaded config, knowledge and prompts
    pub fn from_config(
        config: &AdvisorConfig,
        knowledge: KnowledgeBase,
        prompts: &PromptLibrary,
        backend: B,
    ) -> Result<Self> {
        let generator = AdviceGenerator::from_library(backend, prompts)?;
        Ok(Self::new(knowledge, config.policy, generator))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn generator(&self) -> &AdviceGenerator<B> {
        &self.generator
    }

    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.knowledge, self.policy)
    }

    /// Answer a question: canned answer if one matches, otherwise AI advice
    /// with the question as context
    pub async fn answer_question(&self, question: &str, profile: &ExpenseProfile) -> AdviceResult {
        if let Some(answer) = self.matcher().answer(question) {
            return AdviceResult::Canned(answer.to_string());
        }

        debug!("No canned answer, asking the AI service");
        self.generator.generate(profile, question).await.into()
    }

    /// AI advice for the profile, never consulting the knowledge base
    pub async fn get_advice(&self, profile: &ExpenseProfile, notes: &str) -> AdviceResult {
        self.generator.generate(profile, notes).await.into()
    }
}
