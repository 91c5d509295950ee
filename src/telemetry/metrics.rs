//! Prometheus metrics

use crate::candle::Timeframe;
use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Divergences found by a scan
    SignalsDetected,
    /// Notifications delivered
    NotificationsSent,
    /// Notifications skipped because the key was already recorded
    DuplicatesSuppressed,
    /// Scans that failed to fetch or notify
    ScanErrors,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::SignalsDetected => "divscan_signals_detected_total",
            CounterMetric::NotificationsSent => "divscan_notifications_sent_total",
            CounterMetric::DuplicatesSuppressed => "divscan_duplicates_suppressed_total",
            CounterMetric::ScanErrors => "divscan_scan_errors_total",
        }
    }
}

/// Increment a counter labelled by timeframe
pub fn increment(metric: CounterMetric, timeframe: Timeframe, value: u64) {
    metrics::counter!(metric.name(), "timeframe" => timeframe.as_str()).increment(value);
}

/// Record the wall-clock duration of a full scan cycle
pub fn record_scan_cycle(duration: Duration) {
    metrics::histogram!("divscan_scan_cycle_seconds").record(duration.as_secs_f64());
    tracing::debug!(
        metric = "divscan_scan_cycle_seconds",
        value_ms = duration.as_millis() as u64,
        "Recording scan cycle"
    );
}

/// Set the number of symbols in the scan universe
pub fn set_universe_size(count: usize) {
    metrics::gauge!("divscan_symbols").set(count as f64);
}
