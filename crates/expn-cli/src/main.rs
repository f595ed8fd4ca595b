//! Expn CLI - Budget assistant
//!
//! Usage:
//!   expn ask "how to save on groceries"   Canned answer or AI advice
//!   expn advise --income 40000 --rent 15000
//!   expn match "track expenses"           Knowledge base lookup only
//!   expn status                           Config, knowledge base, AI backend

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use expn_core::PromptLibrary;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.policy.as_deref())?;

    match cli.command {
        Commands::Ask {
            question,
            profile,
            json,
        } => {
            let advisor = commands::open_advisor(&config, cli.knowledge.as_deref())?;
            commands::cmd_ask(&advisor, &question, &profile.to_profile()?, json).await?;
            Ok(())
        }
        Commands::Advise {
            notes,
            profile,
            json,
        } => {
            let advisor = commands::open_advisor(&config, cli.knowledge.as_deref())?;
            commands::cmd_advise(&advisor, &notes, &profile.to_profile()?, json).await?;
            Ok(())
        }
        Commands::Match { query } => {
            let knowledge = commands::load_knowledge(cli.knowledge.as_deref())?;
            commands::cmd_match(&knowledge, config.policy, &query)?;
            Ok(())
        }
        Commands::Knowledge => {
            let knowledge = commands::load_knowledge(cli.knowledge.as_deref())?;
            commands::cmd_knowledge(&knowledge)
        }
        Commands::Prompts { action } => {
            let library = PromptLibrary::new();
            match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(&library),
                Some(PromptsAction::Show { prompt_id }) => {
                    commands::cmd_prompts_show(&library, &prompt_id)
                }
                Some(PromptsAction::Path) => commands::cmd_prompts_path(),
            }
        }
        Commands::Status => commands::cmd_status(&config, cli.knowledge.as_deref()).await,
    }
}
