//! Access logging middleware.
//!
//! One `access` event per request, emitted after the response is produced,
//! plus the matching request metrics.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::http::request::request_id;
use crate::http::response::Served;
use crate::observability::metrics;

pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request_id(&request).to_string();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let served = response
        .extensions()
        .get::<Served>()
        .copied()
        .unwrap_or(Served::Static);

    tracing::info!(
        target: "access",
        request_id = %request_id,
        endpoint = %format!("{} {}", method, uri),
        status,
        served = served.as_str(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    metrics::record_request(method.as_str(), status, served.as_str(), start);

    response
}
