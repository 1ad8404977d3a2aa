//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_http_requests_total` (counter): requests by method, status
//! - `relay_http_request_duration_seconds` (histogram): latency distribution
//! - `relay_email_sends_total` (counter): dispatch outcomes (sent, failed, invalid)
//! - `relay_ws_connections_total` (counter): accepted WebSocket connections
//! - `relay_ws_active_connections` (gauge): currently open WebSocket connections

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("relay_http_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one dispatch.
pub fn record_send(outcome: &'static str) {
    metrics::counter!("relay_email_sends_total", "outcome" => outcome).increment(1);
}

pub fn record_ws_connected() {
    metrics::counter!("relay_ws_connections_total").increment(1);
    metrics::gauge!("relay_ws_active_connections").increment(1.0);
}

pub fn record_ws_disconnected() {
    metrics::gauge!("relay_ws_active_connections").decrement(1.0);
}

/// Middleware recording count and latency for every HTTP response.
pub async fn track_http(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    record_request(method.as_str(), response.status().as_u16(), start);
    response
}
