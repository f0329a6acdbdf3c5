//! Metrics collection and exposition.
//!
//! # Metrics
//! - `spa_requests_total` (counter): requests by method, status and kind
//! - `spa_request_duration_seconds` (histogram): latency by kind
//!
//! Kind is what produced the response: `static`, `fallback`, `not_found`, `redirect`.
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(method: &str, status: u16, kind: &'static str, start: Instant) {
    metrics::counter!(
        "spa_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "kind" => kind,
    )
    .increment(1);
    metrics::histogram!("spa_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}
