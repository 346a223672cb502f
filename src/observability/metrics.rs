//! Metrics collection and exposition.
//!
//! # Metrics
//! - `receipt_polls_total` (counter): receipt requests by endpoint
//! - `confirmation_outcomes_total` (counter): final tracker states
//! - `node_health` (gauge): 1=reachable, 0=unreachable, by endpoint
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::blockchain::TransactionState;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_receipt_poll(endpoint: &str) {
    metrics::counter!("receipt_polls_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_confirmation_outcome(state: TransactionState) {
    metrics::counter!("confirmation_outcomes_total", "state" => state.as_str()).increment(1);
}

pub fn record_node_health(endpoint: &str, healthy: bool) {
    metrics::gauge!("node_health", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
