//! Metrics exposition.
//!
//! # Metrics
//! - `blob_node_requests_total` (counter): requests by handler, status
//! - `blob_node_request_duration_seconds` (histogram): latency distribution
//! - `blob_node_bytes_read_total` / `blob_node_bytes_written_total` (counters)
//! - `blob_node_volume_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! Counters are updated by [`NodeStats`](crate::observability::stats::NodeStats);
//! without an installed recorder every update is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Export the volume health state.
pub fn record_volume_health(healthy: bool) {
    metrics::gauge!("blob_node_volume_healthy").set(if healthy { 1.0 } else { 0.0 });
}
