/// Metrics and telemetry for the gateway
///
/// Prometheus-compatible counters for resolution outcomes, signing and
/// metadata store lookups.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Resolution requests by record kind and outcome
    pub static ref RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "ccip_resolutions_total",
        "Total number of resolution requests",
        &["record", "outcome"]
    )
    .unwrap();

    /// Responses signed
    pub static ref RESPONSES_SIGNED_TOTAL: IntCounter = register_int_counter!(
        "ccip_responses_signed_total",
        "Total number of signed gateway responses"
    )
    .unwrap();

    /// Metadata store lookup latency by table
    pub static ref STORE_LOOKUP_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "ccip_store_lookup_duration_seconds",
        "Metadata store lookup latencies in seconds",
        &["table"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record the outcome of one resolution request
pub fn record_resolution(record: &str, outcome: &str) {
    RESOLUTIONS_TOTAL.with_label_values(&[record, outcome]).inc();
}

/// Record a metadata store lookup
pub fn record_store_lookup(table: &str, duration: f64) {
    STORE_LOOKUP_DURATION_SECONDS
        .with_label_values(&[table])
        .observe(duration);
}
