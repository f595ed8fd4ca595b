//! Prompts-related command implementations

use anyhow::{bail, Result};
use expn_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// List all available prompts and their override status
pub fn cmd_prompts_list(library: &PromptLibrary) -> Result<()> {
    let prompts = library.list();

    println!("Available Prompts:\n");

    // Header
    println!(
        "{:<20} {:>7}  {:<12}  {}",
        "ID", "VERSION", "TASK TYPE", "OVERRIDE"
    );
    println!("{}", "-".repeat(55));

    for info in prompts {
        let override_status = if info.has_override {
            "✓ Custom"
        } else {
            "Default"
        };

        println!(
            "{:<20} {:>7}  {:<12}  {}",
            info.id, info.version, info.task_type, override_status
        );
    }

    println!();
    println!(
        "Override directory: {}",
        library
            .override_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file with your changes");
    println!("  3. The next expn command picks it up");

    Ok(())
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(library: &PromptLibrary, prompt_id: &str) -> Result<()> {
    let Some(id) = PromptId::from_name(prompt_id) else {
        let available = PromptId::all()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        bail!("Unknown prompt ID: {} (available: {})", prompt_id, available);
    };

    let prompt = library.load(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!("Task Type: {}", prompt.metadata.task_type);
    println!(
        "Source: {}",
        if prompt.is_override {
            "Override"
        } else {
            "Default"
        }
    );

    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            // Check if directory exists
            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
