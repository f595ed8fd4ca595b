//! Advisor configuration
//!
//! Built once at startup and passed by reference to the matcher and
//! generator; nothing in the core reads global state.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Explicit path, or the override in data dir (~/.local/share/expn/config/advisor.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Credentials never live here; backends read them from the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::matcher::MatchPolicy;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/advisor.toml");

/// Default bound on a single AI request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Effective advisor configuration
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Knowledge-base match policy
    pub policy: MatchPolicy,
    /// Timeout applied to every AI request
    pub timeout: Duration,
    /// Model override used when the backend's env var is unset
    pub model: Option<String>,
    /// File the config was read from (None for embedded defaults)
    pub config_path: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            model: None,
            config_path: None,
        }
    }
}

impl AdvisorConfig {
    /// Load with override resolution
    ///
    /// An explicit path must exist. Without one, the data dir override is used
    /// when present, otherwise the embedded defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::NotFound(format!("Config file {}", path.display())));
            }
            return Self::from_file(path);
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                debug!(path = %path.display(), "Loading config override");
                return Self::from_file(&path);
            }
        }

        Self::embedded()
    }

    /// The defaults compiled into the binary
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
        let mut config = parse_config(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Replace the match policy (CLI override)
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("expn").join("config").join("advisor.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    matching: Option<RawMatching>,
    generation: Option<RawGeneration>,
}

#[derive(Debug, Deserialize)]
struct RawMatching {
    policy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    timeout_secs: Option<u64>,
    model: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AdvisorConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AdvisorConfig::default();

    if let Some(matching) = raw.matching {
        if let Some(policy) = matching.policy {
            config.policy = policy.parse().map_err(Error::Config)?;
        }
    }

    if let Some(generation) = raw.generation {
        if let Some(secs) = generation.timeout_secs {
            if secs == 0 {
                return Err(Error::Config("timeout_secs must be at least 1".into()));
            }
            config.timeout = Duration::from_secs(secs);
        }
        config.model = generation.model.filter(|m| !m.trim().is_empty());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config() {
        let config = AdvisorConfig::embedded().unwrap();
        assert_eq!(config.policy, MatchPolicy::Containment);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.model.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
[matching]
policy = "fuzzy_ratio"

[generation]
timeout_secs = 15
model = "gemini-1.5-flash"
"#,
        )
        .unwrap();

        assert_eq!(config.policy, MatchPolicy::FuzzyRatio);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.policy, MatchPolicy::Containment);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            parse_config("[matching]\npolicy = \"semantic\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            parse_config("[generation]\ntimeout_secs = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(parse_config("[matching"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advisor.toml");
        fs::write(&path, "[matching]\npolicy = \"fuzzy_ratio\"\n").unwrap();

        let config = AdvisorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.policy, MatchPolicy::FuzzyRatio);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));

        let missing = AdvisorConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_with_policy() {
        let config = AdvisorConfig::default().with_policy(MatchPolicy::FuzzyRatio);
        assert_eq!(config.policy, MatchPolicy::FuzzyRatio);
    }
}
