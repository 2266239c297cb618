use qtype_dns_domain::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. The level comes from the configuration
/// (which already carries `--log-level`), else `RUST_LOG`, else "info".
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(
        config.level.as_deref(),
        EnvFilter::try_from_default_env().ok(),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

/// A configured level that does not parse falls through to the environment.
fn build_filter(configured: Option<&str>, from_env: Option<EnvFilter>) -> EnvFilter {
    configured
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or(from_env)
        .unwrap_or_else(|| EnvFilter::new("info"))
}
