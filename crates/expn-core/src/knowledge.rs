//! Knowledge base of canned budgeting answers
//!
//! The knowledge base is loaded once at startup with a two-layer resolution:
//! 1. Explicit path, or the override in the data dir (~/.local/share/expn/knowledge.toml)
//! 2. Fall back to the embedded default (compiled into binary)
//!
//! Entries keep the order they appear in the file. That order is the
//! matcher's tie-break, so it is part of the knowledge base's meaning.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default knowledge base (compiled into binary)
const DEFAULT_KNOWLEDGE: &str = include_str!("../../../config/knowledge.toml");

/// Split text into lower-cased alphanumeric word tokens
///
/// Punctuation and whitespace separate tokens and never form tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOKEN_RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

    let lowered = text.to_lowercase();
    re.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A canonical question and its canned answer
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
    /// Tokens of the question, computed once at load
    #[serde(skip)]
    tokens: Vec<String>,
    /// Lower-cased question, compared by the fuzzy-ratio policy
    #[serde(skip)]
    lowered: String,
}

impl KnowledgeEntry {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            tokens: tokenize(question),
            lowered: question.to_lowercase(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub(crate) fn lowered(&self) -> &str {
        &self.lowered
    }
}

/// Immutable, ordered set of knowledge entries
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    /// File the entries came from (None for the embedded default)
    source: Option<PathBuf>,
}

/// Raw file structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawKnowledge {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    question: String,
    answer: String,
}

impl KnowledgeBase {
    /// Build from (question, answer) pairs, validating them
    ///
    /// Questions must be unique after normalization and contain at least one
    /// word; answers must be non-empty.
    pub fn from_pairs<Q, A>(pairs: impl IntoIterator<Item = (Q, A)>) -> Result<Self>
    where
        Q: AsRef<str>,
        A: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (question, answer) in pairs {
            let entry = KnowledgeEntry::new(question.as_ref().trim(), answer.as_ref().trim());

            if entry.tokens.is_empty() {
                return Err(Error::InvalidData(format!(
                    "Knowledge question has no words: {:?}",
                    question.as_ref()
                )));
            }
            if entry.answer.is_empty() {
                return Err(Error::InvalidData(format!(
                    "Knowledge answer is empty for question: {}",
                    entry.question
                )));
            }
            if !seen.insert(entry.tokens.join(" ")) {
                return Err(Error::InvalidData(format!(
                    "Duplicate knowledge question: {}",
                    entry.question
                )));
            }

            entries.push(entry);
        }

        Ok(Self {
            entries,
            source: None,
        })
    }

    /// Parse a knowledge base from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawKnowledge = toml::from_str(content)
            .map_err(|e| Error::InvalidData(format!("Invalid knowledge TOML: {}", e)))?;
        Self::from_pairs(raw.entries.into_iter().map(|e| (e.question, e.answer)))
    }

    /// The knowledge base compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::parse(DEFAULT_KNOWLEDGE)
    }

    /// Load from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Knowledge file {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let mut kb = Self::parse(&content)?;
        kb.source = Some(path.to_path_buf());
        Ok(kb)
    }

    /// Load with override resolution
    ///
    /// An explicit path must exist. Without one, the data dir override is used
    /// when present, otherwise the embedded default.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = default_knowledge_path() {
            if path.exists() {
                debug!(path = %path.display(), "Loading knowledge override");
                return Self::from_file(&path);
            }
        }

        Self::embedded()
    }

    /// Entries in match order
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answer for an exact canonical question
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.question == question)
            .map(|e| e.answer.as_str())
    }

    /// Path the entries were loaded from (None for the embedded default)
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Default knowledge override path
pub fn default_knowledge_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("expn").join("knowledge.toml"))
}
