//! Metrics collection and exposition.
//!
//! # Metrics
//! - `header_override_requests_total` (counter): requests seen by the override layer
//! - `header_override_shadow_applied_total` (counter): headers replaced by a shadow header
//! - `header_override_fixed_rewritten_total` (counter): fixed headers that changed a request
//!
//! # Design Decisions
//! - Uses the `metrics` facade; recording is a no-op until a recorder is installed
//! - Prometheus exposition via its own HTTP listener, separate from the app port

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and start its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!(
        "header_override_requests_total",
        "Requests processed by the header override layer"
    );
    describe_counter!(
        "header_override_shadow_applied_total",
        "Header values taken from a shadow header"
    );
    describe_counter!(
        "header_override_fixed_rewritten_total",
        "Fixed headers that replaced or added a value the client did not send"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the outcome of resolving one request's headers.
pub fn record_resolution(shadow_applied: usize, fixed_rewritten: usize) {
    counter!("header_override_requests_total").increment(1);
    if shadow_applied > 0 {
        counter!("header_override_shadow_applied_total").increment(shadow_applied as u64);
    }
    if fixed_rewritten > 0 {
        counter!("header_override_fixed_rewritten_total").increment(fixed_rewritten as u64);
    }
}
