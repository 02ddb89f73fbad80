//! Prometheus metrics for sketch-calc-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// Metric names as constants for consistency
const SUBMISSIONS_TOTAL: &str = "sketch_submissions_total";
const IMAGES_SAVED_TOTAL: &str = "sketch_images_saved_total";
const IMAGE_BYTES: &str = "sketch_image_bytes";
const STORAGE_FAILURES_TOTAL: &str = "sketch_storage_failures_total";
const REASONING_CALLS_TOTAL: &str = "sketch_reasoning_calls_total";
const REASONING_DURATION: &str = "sketch_reasoning_duration_seconds";
const VALIDATION_FAILURES_TOTAL: &str = "sketch_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record the outcome of one `POST /save-image`.
///
/// # Arguments
///
/// * `outcome` - `analysed`, `saved`, or an error kind such as `storage_failure`
pub fn record_submission(outcome: &str) {
    counter!(SUBMISSIONS_TOTAL, "outcome" => outcome.to_string()).increment(1);
}

/// Record an image written to disk.
pub fn record_image_saved(bytes: usize) {
    counter!(IMAGES_SAVED_TOTAL).increment(1);
    histogram!(IMAGE_BYTES).record(bytes as f64);
}

/// Record a failed image write.
pub fn record_storage_failure() {
    counter!(STORAGE_FAILURES_TOTAL).increment(1);
}

/// Record a reasoning service call.
///
/// # Arguments
///
/// * `service` - Service name (e.g. "gemini")
/// * `outcome` - "ok", "service_failure" or "parse_failure"
/// * `duration_secs` - Time spent waiting for the service
pub fn record_reasoning_call(service: &str, outcome: &str, duration_secs: f64) {
    counter!(
        REASONING_CALLS_TOTAL,
        "service" => service.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!(REASONING_DURATION, "service" => service.to_string()).record(duration_secs);
}

/// Record an input validation failure.
///
/// # Arguments
///
/// * `validation_type` - What failed (body, image, variables)
pub fn record_validation_failure(validation_type: &str) {
    counter!(
        VALIDATION_FAILURES_TOTAL,
        "type" => validation_type.to_string()
    )
    .increment(1);
}
