//! Advice generator
//!
//! Builds a budget prompt from an [`ExpenseProfile`] and optional user text,
//! sends it to an AI backend once, and folds whatever comes back into a
//! [`GenerationOutcome`]. Backend failures never escape as errors: a failed
//! call becomes `ServiceError`, a call with no usable text `EmptyResponse`.

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::ai::AIBackend;
use crate::error::Result;
use crate::profile::{format_currency, ExpenseProfile};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Result of one generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// The service's text, unmodified
    Succeeded(String),
    /// The call failed; carries the underlying error detail
    ServiceError(String),
    /// The call succeeded but produced no usable text
    EmptyResponse,
}

/// Turns expense profiles into AI-generated savings advice
pub struct AdviceGenerator<B> {
    backend: B,
    prompt: Prompt,
}

impl<B: AIBackend> AdviceGenerator<B> {
    /// Create a generator with an already-loaded prompt
    pub fn new(backend: B, prompt: Prompt) -> Self {
        Self { backend, prompt }
    }

    /// Create a generator using the prompt library's budget advice prompt
    pub fn from_library(backend: B, library: &PromptLibrary) -> Result<Self> {
        let prompt = library.load(PromptId::BudgetAdvice)?;
        Ok(Self::new(backend, prompt))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// Render the user prompt for a profile and optional free text
    ///
    /// Deterministic: the same inputs always render the same text.
    pub fn build_prompt(&self, profile: &ExpenseProfile, user_input: &str) -> String {
        let income = format_currency(profile.income());
        let expenses = profile
            .expenses()
            .iter()
            .map(|(category, amount)| {
                format!(
                    "- {} ({}): {}",
                    category.as_str(),
                    category.label(),
                    format_currency(*amount)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let expenses = if expenses.is_empty() {
            "- none listed".to_string()
        } else {
            expenses
        };
        let total = format_currency(profile.total_expenses());
        let remaining = format_currency(profile.remaining());

        let mut vars = HashMap::new();
        vars.insert("income", income.as_str());
        vars.insert("expenses", expenses.as_str());
        vars.insert("total_expenses", total.as_str());
        vars.insert("remaining", remaining.as_str());
        vars.insert("user_input", user_input);

        self.prompt.render_user(&vars)
    }

    /// Generate advice with a single call to the backend
    pub async fn generate(&self, profile: &ExpenseProfile, user_input: &str) -> GenerationOutcome {
        let prompt = self.build_prompt(profile, user_input);
        let start = Instant::now();

        let result = self
            .backend
            .generate(self.prompt.system_section(), &prompt)
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Some(text)) => {
                info!(
                    model = self.backend.model(),
                    elapsed_ms,
                    chars = text.len(),
                    "AI advice generated"
                );
                GenerationOutcome::Succeeded(text)
            }
            Ok(None) => {
                warn!(model = self.backend.model(), elapsed_ms, "AI returned no advice");
                GenerationOutcome::EmptyResponse
            }
            Err(e) => {
                warn!(
                    model = self.backend.model(),
                    host = self.backend.host(),
                    elapsed_ms,
                    error = %e,
                    "AI advice request failed"
                );
                GenerationOutcome::ServiceError(e.to_string())
            }
        }
    }
}
