//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Route `access` events to the optional JSON access log file
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level for stdout only
//! - The access log records every `info` access event whatever the stdout level
//! - Human-readable output on stdout, JSON lines in the access log

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::{Level, Subscriber};
use tracing_subscriber::{
    filter::Targets, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::ObservabilityConfig;

/// Target used by access log events.
pub const ACCESS_TARGET: &str = "access";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open access log: {0}")]
    AccessLog(#[from] std::io::Error),

    #[error("logging already initialized: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Default filter directives for a level.
pub fn default_directives(level: &str) -> String {
    format!("spa_server={level},{ACCESS_TARGET}={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    subscriber(config, filter)?.try_init()?;
    Ok(())
}

/// Stdout layer under `filter`, plus the access log file layer when configured.
fn subscriber(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError> {
    let access_log = match &config.access_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_filter(Targets::new().with_target(ACCESS_TARGET, Level::INFO)),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .with(access_log))
}
