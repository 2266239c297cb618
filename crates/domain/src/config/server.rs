use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Domain suffix served by this instance. "." serves everything.
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Host-port to listen on for both UDP and TCP. An empty host (":53")
    /// means every interface, IPv4 and IPv6.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_tcp_idle_timeout_secs")]
    pub tcp_idle_timeout_secs: u64,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = self.address.trim();
        let full = if address.starts_with(':') {
            format!("[::]{}", address)
        } else {
            address.to_string()
        };
        full.parse::<SocketAddr>().map_err(|e| {
            ConfigError::Validation(format!("Invalid listen address '{}': {}", self.address, e))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            address: default_address(),
            tcp_idle_timeout_secs: default_tcp_idle_timeout_secs(),
        }
    }
}

fn default_domain() -> String {
    ".".to_string()
}

fn default_address() -> String {
    ":53".to_string()
}

fn default_tcp_idle_timeout_secs() -> u64 {
    10
}
