//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;

use clap::Parser;
use expn_core::test_utils::{MockGeminiServer, MockMode};
use expn_core::{
    AIBackend, AIClient, AdviceFailure, AdviceResult, AdviceSource, Advisor, AdvisorConfig,
    ExpenseProfile, GeminiBackend, KnowledgeBase, MatchPolicy, MockBackend, PromptLibrary,
};

use crate::cli::{Cli, Commands, ProfileArgs};
use crate::commands;

fn advisor_with<B: AIBackend>(backend: B) -> Advisor<B> {
    Advisor::from_config(
        &AdvisorConfig::default(),
        KnowledgeBase::embedded().unwrap(),
        &PromptLibrary::embedded_only(),
        backend,
    )
    .unwrap()
}

fn gemini_client(server: &MockGeminiServer) -> AIClient {
    AIClient::Gemini(GeminiBackend::with_base_url(
        &server.url(),
        "test-key",
        "gemini-1.5-pro",
    ))
}

fn parse_profile(args: &[&str]) -> ProfileArgs {
    let mut argv = vec!["expn", "advise"];
    argv.extend_from_slice(args);
    match Cli::try_parse_from(argv).unwrap().command {
        Commands::Advise { profile, .. } => profile,
        _ => panic!("expected advise command"),
    }
}

// ========== Argument Tests ==========

#[test]
fn test_profile_flags_default_to_default_profile() {
    let profile = parse_profile(&[]).to_profile().unwrap();
    assert_eq!(profile, ExpenseProfile::default());
}

#[test]
fn test_profile_flags_override_amounts() {
    let profile = parse_profile(&["--income", "40000", "--rent", "15000.5"])
        .to_profile()
        .unwrap();
    assert_eq!(profile.income(), 40000.0);
    assert_eq!(profile.total_expenses(), 28000.5);
}

#[test]
fn test_profile_flags_reject_negative_amount() {
    let args = parse_profile(&["--food=-100"]);
    assert!(args.to_profile().is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["expn", "match", "track expenses", "--policy", "fuzzy-ratio"])
        .unwrap();
    assert_eq!(cli.policy.as_deref(), Some("fuzzy-ratio"));
    assert!(matches!(cli.command, Commands::Match { .. }));
}

// ========== Config Loading Tests ==========

#[test]
fn test_load_config_policy_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("advisor.toml");
    fs::write(&path, "[matching]\npolicy = \"containment\"\n").unwrap();

    let config = commands::load_config(Some(&path), None).unwrap();
    assert_eq!(config.policy, MatchPolicy::Containment);

    let config = commands::load_config(Some(&path), Some("fuzzy-ratio")).unwrap();
    assert_eq!(config.policy, MatchPolicy::FuzzyRatio);
}

#[test]
fn test_load_config_rejects_unknown_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("advisor.toml");
    fs::write(&path, "").unwrap();

    assert!(commands::load_config(Some(&path), Some("semantic")).is_err());
}

#[test]
fn test_load_knowledge_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::load_knowledge(Some(&dir.path().join("missing.toml")));
    assert!(result.is_err());
}

// ========== Ask / Advise Command Tests ==========

#[tokio::test]
async fn test_cmd_ask_canned_answer() {
    let backend = MockBackend::new();
    let advisor = advisor_with(backend.clone());

    let result = commands::cmd_ask(
        &advisor,
        "best way to track expenses",
        &ExpenseProfile::default(),
        false,
    )
    .await
    .unwrap();

    assert_eq!(
        result,
        AdviceResult::Canned("Use budgeting apps or maintain an expense tracker.".to_string())
    );
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_cmd_ask_rejects_blank_question() {
    let backend = MockBackend::new();
    let advisor = advisor_with(backend.clone());

    let result = commands::cmd_ask(&advisor, "   ", &ExpenseProfile::default(), false).await;
    assert!(result.is_err());
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_cmd_ask_falls_back_to_gemini() {
    let server = MockGeminiServer::start(MockMode::Reply(
        "Negotiate your rent at renewal.".to_string(),
    ))
    .await;
    let advisor = advisor_with(gemini_client(&server));

    let result = commands::cmd_ask(
        &advisor,
        "Is 40% of income on rent too much?",
        &ExpenseProfile::default(),
        true,
    )
    .await
    .unwrap();

    assert_eq!(
        result,
        AdviceResult::Generated("Negotiate your rent at renewal.".to_string())
    );

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].api_key.as_deref(), Some("test-key"));
    let prompt = requests[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(prompt.contains("Is 40% of income on rent too much?"));
    assert!(prompt.contains("25000"));
}

#[tokio::test]
async fn test_cmd_advise_service_error_is_reported_not_raised() {
    let server = MockGeminiServer::start(MockMode::Status(429)).await;
    let advisor = advisor_with(gemini_client(&server));

    let result = commands::cmd_advise(&advisor, "", &ExpenseProfile::default(), false)
        .await
        .unwrap();

    assert_eq!(result.source(), AdviceSource::Error);
    assert!(result.text().starts_with("⚠️ Error getting AI advice:"));
    assert!(result.text().contains("429"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_cmd_advise_empty_response() {
    let server = MockGeminiServer::start(MockMode::Empty).await;
    let advisor = advisor_with(gemini_client(&server));

    let result = commands::cmd_advise(&advisor, "car loan", &ExpenseProfile::default(), true)
        .await
        .unwrap();

    assert_eq!(result, AdviceResult::Failed(AdviceFailure::EmptyResponse));
}

#[tokio::test]
async fn test_cmd_advise_skips_knowledge_base() {
    let backend = MockBackend::replying("Automate a monthly transfer.");
    let advisor = advisor_with(backend.clone());

    let result = commands::cmd_advise(
        &advisor,
        "how much should i save monthly",
        &ExpenseProfile::default(),
        false,
    )
    .await
    .unwrap();

    assert_eq!(result.source(), AdviceSource::Generated);
    assert_eq!(backend.call_count(), 1);
}

// ========== Knowledge Command Tests ==========

#[test]
fn test_cmd_match() {
    let knowledge = KnowledgeBase::embedded().unwrap();

    let answer = commands::cmd_match(&knowledge, MatchPolicy::Containment, "transportation cost")
        .unwrap();
    assert_eq!(
        answer.as_deref(),
        Some("Use public transport, carpool, or opt for fuel-efficient vehicles.")
    );

    let none = commands::cmd_match(&knowledge, MatchPolicy::Containment, "crypto").unwrap();
    assert!(none.is_none());
}

#[test]
fn test_cmd_match_fuzzy() {
    let knowledge = KnowledgeBase::embedded().unwrap();
    let answer = commands::cmd_match(
        &knowledge,
        MatchPolicy::FuzzyRatio,
        "how to reduce transport costs",
    )
    .unwrap();
    assert_eq!(
        answer.as_deref(),
        Some("Use public transport, carpool, or opt for fuel-efficient vehicles.")
    );
}

#[test]
fn test_cmd_knowledge_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.toml");
    fs::write(
        &path,
        "[[entries]]\nquestion = \"what is a sinking fund\"\nanswer = \"Money set aside for a known future expense.\"\n",
    )
    .unwrap();

    let knowledge = commands::load_knowledge(Some(&path)).unwrap();
    assert_eq!(knowledge.len(), 1);
    assert!(commands::cmd_knowledge(&knowledge).is_ok());
}

// ========== Prompts Command Tests ==========

#[test]
fn test_cmd_prompts_list() {
    let library = PromptLibrary::embedded_only();
    assert!(commands::cmd_prompts_list(&library).is_ok());
}

#[test]
fn test_cmd_prompts_show() {
    let library = PromptLibrary::embedded_only();
    assert!(commands::cmd_prompts_show(&library, "budget_advice").is_ok());
    assert!(commands::cmd_prompts_show(&library, "classify_merchant").is_err());
}
