//! Metrics collection and Prometheus export.
//!
//! Installs the Prometheus recorder and provides the domain counters used by
//! the catalog.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;
use std::time::Duration;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("failed to install Prometheus recorder: {}", e))
    })?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_store_operation(operation: &'static str, success: bool) {
    counter!(
        "movie_store_operations_total",
        "operation" => operation,
        "outcome" => outcome(success)
    )
    .increment(1);
}

pub fn record_completion(model: &str, success: bool, elapsed: Duration) {
    let model = model.to_string();
    counter!(
        "completion_requests_total",
        "model" => model.clone(),
        "outcome" => outcome(success)
    )
    .increment(1);
    histogram!("completion_duration_seconds", "model" => model).record(elapsed.as_secs_f64());
}

fn outcome(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}
