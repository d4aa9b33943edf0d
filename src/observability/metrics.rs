//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route kind and status
//! - `proxy_request_duration_seconds` (histogram): latency by route kind
//! - `proxy_manifest_rewrites_total` (counter): rewrite outcome
//! - `proxy_origin_health` (gauge): 1=healthy, 0=unhealthy
//! - `proxy_origin_probe_duration_seconds` (histogram): probe latency
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! embedded hosts can call these freely.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    counter!("proxy_requests_total", "kind" => kind, "status" => status.to_string()).increment(1);
    histogram!("proxy_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

/// Record whether a fetched manifest could be rewritten.
pub fn record_manifest_rewrite(outcome: &'static str) {
    counter!("proxy_manifest_rewrites_total", "outcome" => outcome).increment(1);
}

/// Record the result of an origin probe.
pub fn record_origin_health(healthy: bool, elapsed: Duration) {
    gauge!("proxy_origin_health").set(if healthy { 1.0 } else { 0.0 });
    histogram!("proxy_origin_probe_duration_seconds").record(elapsed.as_secs_f64());
}
