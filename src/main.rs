//! header-override server
//!
//! ```text
//! Load balancer                  header-override
//!     Host: internal:8080     →  request id → trace → override layer → handler
//!     Host-OVERRIDDEN: api.io                          (handler sees Host: api.io)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use header_override::config::{load_config, validate_config, ConfigError, ServerConfig};
use header_override::observability::{logging, metrics};
use header_override::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "header-override")]
#[command(about = "HTTP server that resolves load balancer header overrides", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let config = ServerConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("header-override v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?cli.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
