//! Configuration loading from TOML and environment variables.
//!
//! The connector reads its configuration from:
//! 1. A TOML config file (default: config/a2a-connector.toml)
//! 2. Environment variables (override TOML values)
//!
//! Environment variable prefix: A2A_

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use a2a_protocol::ValidatorConfig;
use a2a_stream::StreamTopics;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level connector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub system: SystemConfig,
    /// Identity of this connector node.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Stream names.
    #[serde(default)]
    pub topics: StreamTopics,
    /// Registry HTTP read surface.
    #[serde(default)]
    pub http: HttpConfig,
    /// Inbound envelope validation.
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Local agents announced to the registry at startup.
    #[serde(default)]
    pub agents: Vec<LocalAgentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_system_name")]
    pub name: String,
    /// Version advertised in AgentCards.
    #[serde(default = "default_system_version")]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name of this connector node. Replies and events produced by the task
    /// worker are sent from this name.
    #[serde(default = "default_agent_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_http_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Validate inbound task envelopes before processing. Invalid commands
    /// get a `PROCESSING_ERROR` reply; other invalid envelopes are dropped.
    #[serde(default)]
    pub validate_inbound: bool,
    #[serde(default = "default_max_future_skew")]
    pub max_future_skew_secs: u64,
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "a2a_registry=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json_format: bool,
}

/// A local agent announced to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAgentConfig {
    pub name: String,
    /// Agent implementation kind, published as the `type` capability.
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Skill ids, each published as a `true` capability flag.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub streaming: bool,
}

// -- Defaults --

fn default_system_name() -> String {
    "a2a-system".to_string()
}
fn default_system_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
fn default_agent_name() -> String {
    a2a_protocol::PROCESSOR_AGENT.to_string()
}
fn default_true() -> bool {
    true
}
fn default_http_addr() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_max_future_skew() -> u64 {
    a2a_protocol::MAX_FUTURE_SKEW_SECS
}
fn default_max_age() -> u64 {
    a2a_protocol::MAX_MESSAGE_AGE_SECS
}
fn default_log_level() -> String {
    "info".to_string()
}

// -- Trait impls --

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: default_system_name(),
            version: default_system_version(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_addr: default_http_addr(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_inbound: false,
            max_future_skew_secs: default_max_future_skew(),
            max_age_secs: default_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl ValidationConfig {
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            max_future_skew_secs: self.max_future_skew_secs,
            max_age_secs: self.max_age_secs,
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file, with environment variable overrides.
    ///
    /// A missing file is not an error: defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using defaults"
                );
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `A2A_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable numeric values are
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("A2A_AGENT_NAME") {
            self.agent.name = val;
        }
        if let Some(val) = lookup("A2A_HTTP_BIND_ADDR") {
            self.http.bind_addr = val;
        }
        if let Some(val) = lookup("A2A_HTTP_ENABLED") {
            self.http.enabled = parse_flag(&val);
        }
        if let Some(val) = lookup("A2A_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("A2A_TOPIC_TASKS") {
            self.topics.tasks = val;
        }
        if let Some(val) = lookup("A2A_TOPIC_REPLIES") {
            self.topics.replies = val;
        }
        if let Some(val) = lookup("A2A_TOPIC_EVENTS") {
            self.topics.events = val;
        }
        if let Some(val) = lookup("A2A_TOPIC_REGISTRY") {
            self.topics.registry = val;
        }
        if let Some(val) = lookup("A2A_VALIDATE_INBOUND") {
            self.validation.validate_inbound = parse_flag(&val);
        }
        if let Some(val) = lookup("A2A_MAX_FUTURE_SKEW_SECS") {
            if let Ok(secs) = val.parse() {
                self.validation.max_future_skew_secs = secs;
            }
        }
        if let Some(val) = lookup("A2A_MAX_AGE_SECS") {
            if let Ok(secs) = val.parse() {
                self.validation.max_age_secs = secs;
            }
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "true" || val == "1"
}
