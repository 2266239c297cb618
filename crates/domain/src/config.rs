pub mod errors;
pub mod forwarding;
pub mod logging;
pub mod records;
pub mod root;
pub mod server;
pub mod upstream;

pub use errors::ConfigError;
pub use forwarding::ForwardingConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use records::RecordsConfig;
pub use root::{CliOverrides, Config, ServerMode};
pub use server::ServerConfig;
pub use upstream::{UpstreamConfig, UpstreamProtocol};
