//! halsimd - Switch HAL Simulation Daemon
//!
//! Entry point for the halsimd daemon. Serves the line-delimited JSON event
//! endpoint and fans inbound hardware events out to registered subscribers.

use clap::Parser;
use halsimd::{HalSimConfig, HalSimError, HalSimServer, Result};
use p4hal_events::EventRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Switch HAL simulation daemon
#[derive(Parser, Debug)]
#[command(name = "halsimd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the daemon configuration file
    #[arg(short = 'c', long, default_value = "/etc/p4hal/halsimd.conf")]
    config: PathBuf,

    /// Listen address override (host:port)
    #[arg(short = 'a', long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(&args.log_level)?;

    info!("halsimd: Starting switch HAL simulation daemon");

    match run_daemon(args).await {
        Ok(()) => {
            info!("halsimd: Daemon exiting normally");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "halsimd: Daemon exiting with error");
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

/// Initialize structured logging. `RUST_LOG` overrides the CLI level.
fn init_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).compact())
        .try_init()
        .map_err(|e| HalSimError::Configuration(format!("Failed to set logger: {}", e)))?;

    Ok(())
}

/// Main daemon loop: serve the event endpoint until SIGINT.
async fn run_daemon(args: Args) -> Result<()> {
    let mut config = HalSimConfig::load_or_default(&args.config)?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    config.validate()?;
    info!(listen_addr = %config.listen_addr, "halsimd: Configuration loaded");

    let registry = Arc::new(EventRegistry::with_write_timeout(
        config.event_write_timeout(),
    ));
    let server = HalSimServer::new(config, registry);

    server.start().await?;

    signal::ctrl_c().await?;
    info!("halsimd: Received shutdown signal");

    server.shutdown().await?;
    info!("halsimd: Graceful shutdown complete");
    Ok(())
}
