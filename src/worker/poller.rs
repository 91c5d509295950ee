//! Scan cycle and fixed-cadence poll loop

use crate::candle::Timeframe;
use crate::config::ScannerConfig;
use crate::notify::{dedup_key, format_signal_message, NotificationGate};
use crate::scanner::{ScanMode, Scanner};
use crate::symbols::SymbolEntry;
use crate::telemetry::{self, CounterMetric};
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one timeframe x symbol sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Scans that completed
    pub scanned: usize,
    /// Scans that failed to fetch or notify
    pub failed: usize,
    /// Pairs with at least one divergence
    pub signals: usize,
    /// Keys newly recorded (sent, or seeded on the first cycle)
    pub sent: usize,
    /// Keys already in the ledger
    pub duplicates: usize,
}

/// Seconds to sleep so cycles start `interval_secs` apart, never below 1
pub fn cadence_sleep(interval_secs: u64, elapsed: Duration) -> Duration {
    Duration::from_secs(interval_secs.saturating_sub(elapsed.as_secs()).max(1))
}

/// Runs scan cycles over the symbol universe
pub struct Worker {
    config: ScannerConfig,
    symbols: Vec<SymbolEntry>,
    scanner: Arc<Scanner>,
    gate: Arc<NotificationGate>,
}

impl Worker {
    pub fn new(
        config: ScannerConfig,
        symbols: Vec<SymbolEntry>,
        scanner: Arc<Scanner>,
        gate: Arc<NotificationGate>,
    ) -> Self {
        Self {
            config,
            symbols,
            scanner,
            gate,
        }
    }

    fn mode(&self) -> ScanMode {
        ScanMode::from_confirm(self.config.confirm_right)
    }

    /// Scan every timeframe and symbol once.
    ///
    /// Only the newest signal of each pair is offered to the gate. With
    /// `deliver` false new keys are recorded without being sent.
    pub async fn run_cycle(&self, deliver: bool) -> CycleReport {
        let mut report = CycleReport::default();
        for &timeframe in &self.config.timeframes {
            let tf_report = self.scan_timeframe(timeframe, deliver).await;
            tracing::info!(
                timeframe = %timeframe,
                scanned = tf_report.scanned,
                failed = tf_report.failed,
                signals = tf_report.signals,
                sent = tf_report.sent,
                "Timeframe scanned"
            );
            report.scanned += tf_report.scanned;
            report.failed += tf_report.failed;
            report.signals += tf_report.signals;
            report.sent += tf_report.sent;
            report.duplicates += tf_report.duplicates;
        }
        report
    }

    async fn scan_timeframe(&self, timeframe: Timeframe, deliver: bool) -> CycleReport {
        let mode = self.mode();
        let scanner = &self.scanner;
        let results: Vec<_> = stream::iter(&self.symbols)
            .map(|entry| async move { (entry, scanner.scan(entry, timeframe, mode).await) })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let mut report = CycleReport::default();
        for (entry, result) in results {
            let signals = match result {
                Ok(signals) => signals,
                Err(e) => {
                    tracing::warn!(
                        symbol = %entry.display,
                        provider = %entry.provider,
                        timeframe = %timeframe,
                        error = %e,
                        "Scan failed"
                    );
                    report.failed += 1;
                    telemetry::increment(CounterMetric::ScanErrors, timeframe, 1);
                    continue;
                }
            };
            report.scanned += 1;

            let Some(signal) = signals.last() else {
                continue;
            };
            report.signals += 1;
            telemetry::increment(CounterMetric::SignalsDetected, timeframe, 1);

            let key = dedup_key(signal);
            let text = format_signal_message(signal);
            match self.gate.notify_if_new(&key, &text, deliver).await {
                Ok(true) => {
                    report.sent += 1;
                    if deliver {
                        telemetry::increment(CounterMetric::NotificationsSent, timeframe, 1);
                    }
                    tracing::info!(key = %key, delivered = deliver, "New divergence recorded");
                }
                Ok(false) => {
                    report.duplicates += 1;
                    telemetry::increment(CounterMetric::DuplicatesSuppressed, timeframe, 1);
                }
                Err(e) => {
                    report.failed += 1;
                    telemetry::increment(CounterMetric::ScanErrors, timeframe, 1);
                    tracing::warn!(key = %key, error = %e, "Notification failed");
                }
            }
        }
        report
    }

    /// Poll until Ctrl-C.
    ///
    /// The first cycle only seeds the ledger when `seed_on_first_cycle` is
    /// set, so a fresh deployment does not replay historical divergences.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!(
            symbols = self.symbols.len(),
            timeframes = self.config.timeframes.len(),
            mode = ?self.mode(),
            "Starting scan loop"
        );
        telemetry::set_universe_size(self.symbols.len());

        let mut first_cycle = true;
        loop {
            let started = Instant::now();
            tracing::info!(at = %Utc::now().format("%Y-%m-%d %H:%M:%S UTC"), "Scan cycle started");

            let deliver = !(first_cycle && self.config.seed_on_first_cycle);
            let report = self.run_cycle(deliver).await;
            if first_cycle && !deliver {
                tracing::info!(
                    seeded = report.sent,
                    "First cycle recorded existing signals; only new ones will be sent"
                );
            }
            first_cycle = false;

            let elapsed = started.elapsed();
            telemetry::record_scan_cycle(elapsed);
            let sleep = cadence_sleep(self.config.interval_secs, elapsed);
            tracing::info!(
                ?report,
                elapsed_ms = elapsed.as_millis() as u64,
                sleep_secs = sleep.as_secs(),
                "Scan cycle finished"
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested, stopping scan loop");
                    return Ok(());
                }
            }
        }
    }
}
