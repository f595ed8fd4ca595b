//! Shared utilities for loading config, knowledge and the AI client
//!
//! This module contains:
//! - `load_config` - Advisor config with the `--policy` override applied
//! - `load_knowledge` - Knowledge base from `--knowledge`, data dir or built-in
//! - `selected_backend` - Backend named by `AI_BACKEND`
//! - `require_client` - AI client, or an error naming the missing variable
//! - `open_advisor` - Everything `ask` and `advise` need

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use expn_core::{
    AIBackend, AIClient, Advisor, AdvisorConfig, BackendKind, KnowledgeBase, MatchPolicy,
    PromptLibrary,
};
use tracing::debug;

/// Load the advisor config, letting `--policy` win over the file
pub fn load_config(config_path: Option<&Path>, policy: Option<&str>) -> Result<AdvisorConfig> {
    let config = AdvisorConfig::load(config_path).context("Failed to load advisor config")?;

    match policy {
        Some(name) => {
            let policy: MatchPolicy = name.parse().map_err(|e: String| anyhow!(e))?;
            debug!(file = %config.policy, flag = %policy, "Match policy overridden by --policy");
            Ok(config.with_policy(policy))
        }
        None => Ok(config),
    }
}

pub fn load_knowledge(path: Option<&Path>) -> Result<KnowledgeBase> {
    KnowledgeBase::load(path).context("Failed to load knowledge base")
}

/// Backend selected by `AI_BACKEND` (gemini when unset or unknown)
pub fn selected_backend() -> BackendKind {
    std::env::var("AI_BACKEND")
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(BackendKind::Gemini)
}

/// Build the AI client from the environment
///
/// Missing credentials are reported here rather than in the core.
pub fn require_client(config: &AdvisorConfig) -> Result<AIClient> {
    if let Some(client) = AIClient::from_env(config) {
        debug!(
            backend = %client.kind(),
            model = client.model(),
            host = client.host(),
            "AI backend selected"
        );
        return Ok(client);
    }

    let kind = selected_backend();
    match AIClient::required_env(kind) {
        Some(var) => bail!(
            "No {} credentials: set {} (or choose another backend with AI_BACKEND)",
            kind,
            var
        ),
        None => bail!("Could not configure the {} backend", kind),
    }
}

/// Assemble the advisor used by `ask` and `advise`
pub fn open_advisor(config: &AdvisorConfig, knowledge_path: Option<&Path>) -> Result<Advisor<AIClient>> {
    let knowledge = load_knowledge(knowledge_path)?;
    let client = require_client(config)?;
    let library = PromptLibrary::new();

    Advisor::from_config(config, knowledge, &library, client).context("Failed to load prompts")
}
