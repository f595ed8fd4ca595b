//! Status command implementation

use std::path::Path;

use anyhow::Result;
use expn_core::{AIBackend, AIClient, AdvisorConfig, PromptId, PromptLibrary};

use super::{load_knowledge, selected_backend};

pub async fn cmd_status(config: &AdvisorConfig, knowledge_path: Option<&Path>) -> Result<()> {
    println!();
    println!("📊 Expn Status");
    println!("   ─────────────────────────────────────────────────────────────");

    match config.config_path {
        Some(ref path) => println!("   Config: {}", path.display()),
        None => println!("   Config: built-in"),
    }
    println!("   Match policy: {}", config.policy);
    println!("   AI timeout: {}s", config.timeout.as_secs());

    match load_knowledge(knowledge_path) {
        Ok(knowledge) => {
            let source = knowledge
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string());
            println!("   Knowledge base: {} entries ({})", knowledge.len(), source);
        }
        Err(e) => println!("   ❌ Knowledge base: {:#}", e),
    }

    let library = PromptLibrary::new();
    if library.has_override(PromptId::BudgetAdvice) {
        println!("   Prompt: custom override");
    } else {
        println!("   Prompt: default");
    }

    println!();
    let kind = selected_backend();
    match AIClient::from_env(config) {
        Some(client) => print_backend(&client).await,
        None => {
            let var = AIClient::required_env(kind).unwrap_or("AI_BACKEND");
            println!("   ❌ AI backend: {} ({} not set)", kind, var);
        }
    }

    Ok(())
}

async fn print_backend<B: AIBackend>(backend: &B) {
    let info = backend.info();
    println!("   AI backend: {}", info.kind);
    println!("   Model: {}", info.model);
    println!("   Host: {}", info.host);

    print!("   Health: ");
    if backend.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Unreachable");
    }
}
