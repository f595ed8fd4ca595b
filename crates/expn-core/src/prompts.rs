//! Prompt library for the advice generator
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/expn/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! This allows users to customize prompts without modifying the source,
//! while automatically getting new default prompts on upgrade.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const BUDGET_ADVICE: &str = include_str!("../../../prompts/budget_advice.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Budget analysis with savings tips, optionally steered by user text
    BudgetAdvice,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAdvice => "budget_advice",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::BudgetAdvice]
    }

    /// Look up a prompt by its string identifier
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|id| id.as_str() == name)
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::BudgetAdvice => defaults::BUDGET_ADVICE,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Kind of generation the prompt asks for
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render the whole prompt with template variables replaced
    pub fn render(&self, vars: &HashMap<&str, &str>) -> String {
        render_template(&self.content, vars)
    }

    /// Render just the user section (or the whole prompt if it has none)
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        match self.user_section() {
            Some(user) => render_template(user, vars),
            None => self.render(vars),
        }
    }
}

/// Prompt library for loading prompts
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self { override_dir: None }
    }

    /// Load a prompt (checking override first, then default)
    pub fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(override_path) = self.override_path(id) {
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let prompt = self.load(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.as_ref().map(|p| p.metadata.version).unwrap_or(0),
                    task_type: prompt
                        .map(|p| p.metadata.task_type)
                        .unwrap_or_default(),
                    has_override,
                    override_path: if has_override {
                        self.override_path(id)
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        self.override_path(id).is_some_and(|p| p.exists())
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(format!("{}.md", id.as_str())))
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    /// Prompt identifier
    pub id: String,
    /// Version from metadata
    pub version: u32,
    /// Task type from metadata
    pub task_type: String,
    /// Whether an override exists
    pub has_override: bool,
    /// Path to override file (if exists)
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("expn").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    // Section runs until the next top-level header
    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Resolve `{{#if var}}...{{/if}}` blocks, then substitute `{{var}}` in one pass
///
/// Substituted values are inserted verbatim and never re-scanned, so user text
/// containing braces cannot pull in other variables.
fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    let resolved = resolve_conditionals(template, vars);

    let mut out = String::with_capacity(resolved.len());
    let mut rest = resolved.as_str();

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let name = after_open[..close].trim();
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..open + 2 + close + 2]),
                }
                rest = &after_open[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

/// Keep or drop conditional blocks depending on whether the variable is non-empty
fn resolve_conditionals(content: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = content.to_string();

    loop {
        let Some(if_start) = result.find("{{#if ") else {
            break;
        };
        let var_start = if_start + 6;
        let Some(var_end) = result[var_start..].find("}}") else {
            break;
        };
        let var_name = result[var_start..var_start + var_end].trim().to_string();
        let block_start = var_start + var_end + 2;
        let Some(endif_pos) = result[block_start..].find("{{/if}}") else {
            break;
        };
        let block_end = block_start + endif_pos;
        let full_end = block_end + 7;

        let include = vars
            .get(var_name.as_str())
            .is_some_and(|v| !v.trim().is_empty());

        result = if include {
            format!(
                "{}{}{}",
                &result[..if_start],
                &result[block_start..block_end],
                &result[full_end..]
            )
        } else {
            format!("{}{}", &result[..if_start], &result[full_end..])
        };
    }

    result
}
