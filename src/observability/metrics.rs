//! Metrics collection and exposition.
//!
//! # Metrics
//! - `msglog_requests_total` (counter): requests by outcome
//!   (`ok`, `unauthorized`, `no_data`, `invalid_json`, `storage_error`)
//! - `msglog_request_duration_seconds` (histogram): handler latency
//! - `msglog_messages_total` (gauge): messages in the log after the last append
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("msglog_requests_total", "outcome" => outcome).increment(1);
    histogram!("msglog_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_log_length(len: usize) {
    gauge!("msglog_messages_total").set(len as f64);
}
