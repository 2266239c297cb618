use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::forwarding::ForwardingConfig;
use super::logging::LoggingConfig;
use super::records::RecordsConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

/// How queries are answered by this instance.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Relay every question to the upstream chosen by its query type.
    #[default]
    Forward,

    /// Answer from the static record table only.
    Static,
}

/// Main configuration structure for qtype-dns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (domain suffix, address)
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub mode: ServerMode,

    /// Upstream routing table; its keys sit at the top level of the file
    #[serde(flatten)]
    pub forwarding: ForwardingConfig,

    /// Upstream exchange transport
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Static record table
    #[serde(default)]
    pub records: RecordsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load, apply command-line overrides, and validate.
    ///
    /// Files ending in `.toml` are read as TOML, everything else as JSON.
    pub fn load(path: &str, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        let is_toml = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(domain) = overrides.domain {
            self.server.domain = domain;
        }
        if let Some(address) = overrides.address {
            self.server.address = address;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = Some(level);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.domain.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Domain suffix cannot be empty".to_string(),
            ));
        }
        self.server.socket_addr()?;

        if self.upstream.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "upstream.query_timeout must be greater than 0".to_string(),
            ));
        }

        match self.mode {
            ServerMode::Forward => self.forwarding.validate(),
            ServerMode::Static => self.records.validate(),
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub domain: Option<String>,
    pub address: Option<String>,
    pub log_level: Option<String>,
}
