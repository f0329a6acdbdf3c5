//! SPA static server.
//!
//! Serves a public directory over HTTP and, when a certificate pair is
//! configured, HTTPS. Extension-less paths that match no file get the index
//! page so the client-side router can resolve them.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                    SPA SERVER                    │
//!   HTTP request     │  ┌──────────┐   301 to HTTPS (when TLS enabled)  │
//!   ─────────────────┼─▶│ redirect │────────────────────────────────────┼──▶
//!                    │  └──────────┘                                    │
//!   HTTPS request    │  ┌──────────┐   ┌────────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  layers  │──▶│  ServeDir  │──▶│ SPA        │  │
//!                    │  │ id, log, │   │  public/   │   │ fallback   │  │
//!                    │  │ timeout  │   └────────────┘   │ index/404  │  │
//!                    │  └──────────┘                    └────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use spa_server::config::{default_config, load_config, ServerConfig};
use spa_server::http::HttpServer;
use spa_server::lifecycle::{signals, Shutdown};
use spa_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "spa-server")]
#[command(about = "Static HTTP/HTTPS server for single-page applications", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load and validate the configuration, then exit.
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };

    if cli.check {
        println!("configuration OK");
        return Ok(());
    }

    logging::init(&config.observability)?;

    let workers = config.runtime.workers();
    tracing::info!(workers, "spa-server v0.1.0 starting");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()?;

    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        http_address = %config.listener.http_address,
        https = config.tls.is_some(),
        redirect_to_https = config.listener.redirect_to_https,
        root = %config.static_files.root.display(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.http_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
