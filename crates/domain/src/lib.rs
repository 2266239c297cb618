//! qtype-dns domain layer
pub mod config;
pub mod dns_name;
pub mod errors;
pub mod record_type;
pub mod upstream_addr;

pub use config::{
    CliOverrides, Config, ConfigError, ForwardingConfig, LogFormat, LoggingConfig, RecordsConfig,
    ServerConfig, ServerMode, UpstreamConfig, UpstreamProtocol,
};
pub use dns_name::{is_in_zone, normalize_name};
pub use errors::DomainError;
pub use record_type::RecordType;
pub use upstream_addr::{UpstreamAddr, DEFAULT_DNS_PORT};
