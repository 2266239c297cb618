use clap::Parser;
use qtype_dns_domain::{CliOverrides, Config};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "qtype-dns")]
#[command(version)]
#[command(about = "DNS forwarder that picks its upstream by query type")]
struct Cli {
    /// Configuration file path (JSON, or TOML when it ends in .toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: String,

    /// Domain suffix to serve [default: .]
    #[arg(short = 'd', long)]
    domain: Option<String>,

    /// Listen address, host:port or :port [default: :53]
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        domain: cli.domain,
        address: cli.address,
        log_level: cli.log_level,
    };

    let config = Config::load(&cli.config, cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "Starting qtype-dns"
    );

    let dns_services = di::DnsServices::new(&config)?;
    let bind_addr = config.server.socket_addr()?;
    let tcp_idle_timeout = Duration::from_secs(config.server.tcp_idle_timeout_secs);

    let shutdown = CancellationToken::new();
    let dns_server = server::start_dns_server(
        bind_addr,
        dns_services.handler,
        tcp_idle_timeout,
        shutdown.clone(),
    );
    tokio::pin!(dns_server);

    tokio::select! {
        result = &mut dns_server => return result,
        signal = server::shutdown_signal() => {
            info!(signal, "Shutdown signal received");
            shutdown.cancel();
        }
    }

    dns_server.await?;
    info!("Server shutdown complete");
    Ok(())
}
