//! blob-node: storage node HTTP service.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                  BLOB NODE                     │
//!     Client Request      │  ┌──────────┐   ┌─────────┐   ┌────────────┐  │
//!     ────────────────────┼─▶│ listener │──▶│  drain  │──▶│health gate │  │
//!                         │  │plain/TLS │   │  body   │   └─────┬──────┘  │
//!                         │  └──────────┘   └─────────┘         │         │
//!                         │                                     ▼         │
//!     Client Response     │  ┌──────────┐   ┌─────────┐   ┌────────────┐  │
//!     ◀───────────────────┼──│ epilogue │◀──│  reply  │◀──│  dispatch  │  │
//!                         │  │stats+log │   └─────────┘   └────────────┘  │
//!                         │  └──────────┘                                 │
//!                         │                                               │
//!                         │  ┌─────────────────────────────────────────┐  │
//!                         │  │ volume probe │ config watcher │ signals │  │
//!                         │  └─────────────────────────────────────────┘  │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use blob_node::config::loader::load_config;
use blob_node::config::watcher::ConfigWatcher;
use blob_node::config::NodeConfig;
use blob_node::lifecycle::signals::handle_signals;
use blob_node::observability::{logging, metrics};
use blob_node::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "blob-node", version, about = "Storage node HTTP service")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable access logging at startup.
    #[arg(short, long)]
    verbose: bool,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => NodeConfig::default(),
    };
    if args.verbose {
        config.observability.verbose = true;
    }
    if args.check {
        println!("configuration OK");
        return Ok(());
    }

    logging::init(&config.observability)?;

    tracing::info!("blob-node v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        namespace = %config.node.namespace,
        volume = %config.node.volume,
        verbose = config.observability.verbose,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config);

    // Keep the watcher alive for the lifetime of the server
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(w) => (updates, Some(w)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload unavailable");
                    (updates, None)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let signal_shutdown = shutdown.clone();
    let verbosity = server.state().verbosity.clone();
    tokio::spawn(async move {
        if let Err(e) = handle_signals(signal_shutdown, verbosity).await {
            tracing::error!(error = %e, "Failed to install signal handlers");
        }
    });

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
