use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

use crate::error::{AppError, Result};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Global metrics instance.
pub static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Metrics collector for settlement runs.
///
/// Recording is a no-op until a recorder is installed with [`init_metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics;

impl Metrics {
    pub fn new() -> Self {
        Self
    }

    pub fn record_run_completed(&self, participant_count: u64, settlement_count: u64) {
        counter!("cashflow_runs_total").increment(1);
        histogram!("cashflow_participant_count").record(participant_count as f64);
        histogram!("cashflow_settlement_count").record(settlement_count as f64);
    }

    pub fn record_run_rejected(&self, reason: &str) {
        counter!("cashflow_runs_rejected_total", "reason" => reason.to_string()).increment(1);
    }

    pub fn record_edges_processed(&self, edge_count: u64) {
        counter!("cashflow_edges_processed_total").increment(edge_count);
    }

    pub fn record_reduction_ratio(&self, gross_amount: f64, net_amount: f64) {
        if gross_amount > 0.0 {
            let ratio = 1.0 - (net_amount / gross_amount);
            histogram!("cashflow_reduction_ratio").record(ratio);
        }
    }

    pub fn record_run_latency(&self, duration_ms: f64) {
        histogram!("cashflow_run_duration_ms").record(duration_ms);
    }
}

/// Timer for measuring operation latency.
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for LatencyTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the Prometheus recorder once and returns its handle.
pub fn init_metrics() -> Result<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e)))?;
    describe_metrics();

    METRICS.get_or_init(Metrics::new);
    Ok(METRICS_HANDLE.get_or_init(|| handle).clone())
}

fn describe_metrics() {
    describe_counter!("cashflow_runs_total", Unit::Count, "Total number of completed settlement runs");
    describe_counter!("cashflow_runs_rejected_total", Unit::Count, "Total number of rejected settlement runs");
    describe_counter!("cashflow_edges_processed_total", Unit::Count, "Total number of debt edges aggregated");

    describe_histogram!("cashflow_participant_count", Unit::Count, "Participants per settlement run");
    describe_histogram!("cashflow_settlement_count", Unit::Count, "Settlements emitted per run");
    describe_histogram!("cashflow_reduction_ratio", Unit::Count, "Volume reduction ratio (1 - net/gross)");
    describe_histogram!("cashflow_run_duration_ms", Unit::Milliseconds, "Settlement run latency in milliseconds");
}

/// Returns the global metrics instance.
pub fn get_metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}
