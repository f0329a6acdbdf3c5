//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router and server events:
//!     → logging.rs (structured log events; access events also to the JSON access log)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout
//!     → access log file
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
