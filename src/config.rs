//! Configuration loading and merging.

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::script::StatementKind;

/// Env var naming the user config file (useful for testing).
pub const CONFIG_ENV_VAR: &str = "HQL_SPLITTER_CONFIG";

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".hql-splitter.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid regex pattern '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Engine settings applied over the defaults.
    pub overrides: BTreeMap<String, String>,

    /// Statement deny rules.
    pub deny: Vec<DenyRule>,

    /// Output settings.
    pub output: OutputConfig,

    /// Run log settings.
    pub audit: AuditConfig,
}

/// Statement deny rule.
#[derive(Debug, Clone, Deserialize)]
pub struct DenyRule {
    /// Only check statements of this kind (all kinds if unset).
    #[serde(default)]
    pub kind: Option<StatementKind>,
    /// Regex pattern matched against the statement text.
    pub pattern: String,
    /// Human-readable reason for rejecting.
    pub reason: String,
}

/// How statements are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

/// Run log configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable the run log.
    pub enabled: bool,
    /// Path to the JSONL log file.
    pub path: Option<String>,
}

/// Compiled configuration with pre-built regexes.
pub struct CompiledConfig {
    /// The raw config.
    pub raw: Config,
    /// Compiled deny rules.
    pub deny_patterns: Vec<(DenyRule, Regex)>,
}

impl Config {
    /// Load configuration, merging user and project configs.
    pub fn load(cwd: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config()? {
            config = user_config;
        }

        if let Some(cwd) = cwd
            && let Some(project_config) = Self::load_file(&cwd.join(PROJECT_CONFIG_FILE))?
        {
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_user_config() -> Result<Option<Self>, ConfigError> {
        match Self::user_config_path() {
            Some(path) => Self::load_file(&path),
            None => Ok(None),
        }
    }

    fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    /// Get user config path.
    /// Respects HQL_SPLITTER_CONFIG env var for testing.
    fn user_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("hql-splitter.toml"))
    }

    /// Merge another config into this one (other takes precedence for scalars).
    pub fn merge(&mut self, other: Config) {
        self.overrides.extend(other.overrides);
        self.deny.extend(other.deny);

        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
        if other.audit.enabled {
            self.audit.enabled = true;
            if other.audit.path.is_some() {
                self.audit.path = other.audit.path;
            }
        }
    }

    /// Effective output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    /// Compile all regex patterns for faster matching.
    pub fn compile(self) -> Result<CompiledConfig, ConfigError> {
        let deny_patterns = self
            .deny
            .iter()
            .map(|rule| {
                let re = Regex::new(&rule.pattern).map_err(|e| ConfigError::Regex {
                    pattern: rule.pattern.clone(),
                    source: e,
                })?;
                Ok((rule.clone(), re))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(CompiledConfig {
            raw: self,
            deny_patterns,
        })
    }
}
