//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by route, method, status
//! - `relay_request_duration_seconds` (histogram): latency until response headers
//! - `relay_upstream_errors_total` (counter): timeouts and transport failures
//!
//! # Design Decisions
//! - The `metrics` facade is a no-op until an exporter is installed
//! - Labels for route, method, status code

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RouteKind;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(route: RouteKind, method: &str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "relay_requests_total",
        "route" => route.as_str(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!("relay_request_duration_seconds", "route" => route.as_str())
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an upstream timeout or transport failure.
pub fn record_upstream_error(kind: &'static str) {
    ::metrics::counter!("relay_upstream_errors_total", "kind" => kind).increment(1);
}

/// Middleware recording every request against its route.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let route = RouteKind::for_path(request.uri().path());
    let method = request.method().to_string();

    let response = next.run(request).await;

    record_request(route, &method, response.status().as_u16(), start_time);
    response
}
