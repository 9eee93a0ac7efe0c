//! Edge asset relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                   ASSET RELAY                    │
//!   Client Request       │  ┌─────────┐   ┌──────────┐                      │
//!   ─────────────────────┼─▶│  http   │──▶│ routing  │                      │
//!                        │  │ server  │   └────┬─────┘                      │
//!                        │  └─────────┘        │                            │
//!                        │          ┌──────────┴───────────┐                │
//!                        │          ▼                      ▼                │
//!                        │   ┌─────────────┐        ┌─────────────┐         │
//!                        │   │ cache gate  │        │   proxy     │         │
//!                        │   └──────┬──────┘        │ raw / icon  │         │
//!                        │          ▼               └──────┬──────┘         │
//!                        │   ┌─────────────┐               │                │
//!                        │   │    fonts    │  css → binary │                │
//!                        │   │  resolver   │               │                │
//!                        │   └──────┬──────┘               │                │
//!                        │          └───────────┬──────────┘                │
//!                        │                      ▼                           │
//!                        │              ┌──────────────┐                    │
//!                        │              │   upstream   │────────────────────┼──▶ Google Fonts,
//!                        │              │   fetcher    │                    │    raw file host
//!                        │              └──────────────┘                    │
//!                        └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use asset_relay::config::{load_config, validate_config, Environment, RelayConfig};
use asset_relay::lifecycle::signals::trigger_on_signal;
use asset_relay::observability::{logging, metrics};
use asset_relay::{HttpServer, Shutdown};

#[derive(Debug, Parser)]
#[command(name = "asset-relay", version, about = "Edge relay for repository assets and web fonts")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Deployment environment (production and staging enable caching).
    #[arg(short, long, env = "ENVIRONMENT")]
    environment: Option<String>,

    /// Override the listener bind address.
    #[arg(short, long, env = "RELAY_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(environment) = cli.environment {
        config.environment = Environment::from(environment);
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    logging::init_logging(&config.observability, &config.environment);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        bind_address = %config.listener.bind_address,
        cache_namespace = %config.cache.namespace,
        "asset-relay starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        trigger_on_signal(&signal_shutdown).await;
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
