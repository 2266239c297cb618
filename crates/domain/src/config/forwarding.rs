use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::errors::ConfigError;
use crate::{RecordType, UpstreamAddr};

/// Upstream selection by query type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ForwardingConfig {
    /// Catch-all upstreams, used when a query type has no override.
    #[serde(default)]
    pub servers: Vec<String>,

    /// Query-type name (e.g. "AAAA") to the upstreams that answer it.
    #[serde(default)]
    pub qtype_overrides: BTreeMap<String, Vec<String>>,
}

impl ForwardingConfig {
    pub fn parsed_servers(&self) -> Result<Vec<UpstreamAddr>, ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No default upstream servers configured".to_string(),
            ));
        }
        parse_addrs(&self.servers)
    }

    /// Resolves override names to query types once, at startup.
    pub fn parsed_overrides(&self) -> Result<Vec<(RecordType, Vec<UpstreamAddr>)>, ConfigError> {
        let mut overrides = Vec::with_capacity(self.qtype_overrides.len());

        for (name, servers) in &self.qtype_overrides {
            let record_type = RecordType::from_str(name)
                .map_err(|_| ConfigError::UnknownQueryType(name.clone()))?;
            if servers.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Override for {} has no servers",
                    record_type
                )));
            }
            overrides.push((record_type, parse_addrs(servers)?));
        }

        Ok(overrides)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_servers()?;
        self.parsed_overrides()?;
        Ok(())
    }
}

fn parse_addrs(servers: &[String]) -> Result<Vec<UpstreamAddr>, ConfigError> {
    servers
        .iter()
        .map(|s| {
            UpstreamAddr::from_str(s).map_err(|e| ConfigError::Validation(e.to_string()))
        })
        .collect()
}
