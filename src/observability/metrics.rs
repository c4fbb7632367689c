//! Metrics collection and exposition.
//!
//! # Metrics
//! - `notes_requests_total` (counter): requests by route, status
//! - `notes_request_duration_seconds` (histogram): latency distribution
//! - `notes_throttled_total` (counter): requests rejected by the global throttle
//! - `notes_token_rejections_total` (counter): mutating requests with a bad or missing token
//! - `notes_tokens_issued_total` (counter): form tokens issued
//! - `notes_tokens_outstanding` (gauge): tokens held in memory (never evicted)
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("notes_requests_total", "route" => route, "status" => status.to_string()).increment(1);
    histogram!("notes_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_throttled() {
    counter!("notes_throttled_total").increment(1);
}

pub fn record_token_rejected() {
    counter!("notes_token_rejections_total").increment(1);
}

pub fn record_token_issued(outstanding: usize) {
    counter!("notes_tokens_issued_total").increment(1);
    gauge!("notes_tokens_outstanding").set(outstanding as f64);
}
