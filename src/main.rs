//! od2k-proxy entry point.
//!
//! Loads settings, constructs the forwarding proxy and serves it until Ctrl+C.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use od2k_proxy::config::load_config;
use od2k_proxy::observability::init_logging;
use od2k_proxy::{ForwardingProxy, HttpServer};

#[derive(Parser)]
#[command(name = "od2k-proxy")]
#[command(about = "Authenticating gzip-aware reverse proxy", long_about = None)]
struct Cli {
    /// Path to the TOML settings file.
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    tracing::info!("od2k-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;
    let proxy = ForwardingProxy::new(&config)?;

    let bind_address = config.bind_address().ok_or("port is required")?;
    tracing::info!(
        config = %cli.config.display(),
        upstream = proxy.base_url(),
        timeout_secs = proxy.timeout().as_secs(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(proxy).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
