//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use expn_core::{Category, ExpenseProfile};

/// Expn - Budget questions answered, savings advice generated
#[derive(Parser)]
#[command(name = "expn")]
#[command(about = "Budget assistant with canned answers and AI savings advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Advisor config file (defaults to the data dir override, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge base file (defaults to the data dir override, then built-in)
    #[arg(long, global = true)]
    pub knowledge: Option<PathBuf>,

    /// Match policy: containment, fuzzy-ratio (overrides the config file)
    #[arg(long, global = true)]
    pub policy: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a budgeting question (canned answer first, AI advice otherwise)
    Ask {
        /// The question
        question: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get AI savings advice for an expense profile
    Advise {
        /// Extra context for the AI (e.g. "I also pay a car loan")
        #[arg(short, long, default_value = "")]
        notes: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a query against the knowledge base without calling the AI
    Match {
        /// The query
        query: String,
    },

    /// List knowledge base entries
    Knowledge,

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Show configuration, knowledge base and AI backend status
    Status,
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., budget_advice)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

/// Monthly income and expenses, in rupees
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Monthly income
    #[arg(long, default_value_t = 25000.0)]
    pub income: f64,

    /// Rent/Mortgage
    #[arg(long, default_value_t = 10000.0)]
    pub rent: f64,

    /// Food expenses
    #[arg(long, default_value_t = 5000.0)]
    pub food: f64,

    /// Transport
    #[arg(long, default_value_t = 2000.0)]
    pub transport: f64,

    /// Entertainment
    #[arg(long, default_value_t = 1000.0)]
    pub entertainment: f64,

    /// Savings
    #[arg(long, default_value_t = 5000.0)]
    pub savings: f64,
}

impl ProfileArgs {
    /// Validate into an expense profile
    pub fn to_profile(&self) -> Result<ExpenseProfile> {
        let profile = ExpenseProfile::new(self.income)?
            .with_expense(Category::Rent, self.rent)?
            .with_expense(Category::Food, self.food)?
            .with_expense(Category::Transport, self.transport)?
            .with_expense(Category::Entertainment, self.entertainment)?
            .with_expense(Category::Savings, self.savings)?;
        Ok(profile)
    }
}
