//! Advice command implementations (ask, advise)

use anyhow::{bail, Result};
use expn_core::{AIBackend, AdviceResult, AdviceSource, Advisor, ExpenseProfile};

/// Answer a question: canned answer if the knowledge base matches, AI advice otherwise
pub async fn cmd_ask<B: AIBackend>(
    advisor: &Advisor<B>,
    question: &str,
    profile: &ExpenseProfile,
    json: bool,
) -> Result<AdviceResult> {
    if question.trim().is_empty() {
        bail!("Question is empty");
    }

    let result = advisor.answer_question(question, profile).await;
    print_result(&result, json)?;
    Ok(result)
}

/// Ask the AI for savings advice on a profile
pub async fn cmd_advise<B: AIBackend>(
    advisor: &Advisor<B>,
    notes: &str,
    profile: &ExpenseProfile,
    json: bool,
) -> Result<AdviceResult> {
    if !json {
        println!("🤖 Asking {} for advice...\n", advisor.generator().backend().model());
    }

    let result = advisor.get_advice(profile, notes).await;
    print_result(&result, json)?;
    Ok(result)
}

fn print_result(result: &AdviceResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    match result.source() {
        AdviceSource::Canned => println!("💡 {}", result.text()),
        AdviceSource::Generated => {
            println!("📝 AI advice:\n");
            println!("{}", result.text());
        }
        AdviceSource::Error => eprintln!("{}", result.text()),
    }

    Ok(())
}
