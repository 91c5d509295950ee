//! End-to-end integration tests

mod fixtures;

use async_trait::async_trait;
use divscan::candle::{CandleSeries, Timeframe};
use divscan::config::{Config, ScannerConfig};
use divscan::notify::{NotificationGate, Notifier, NotifyError, SentLedger, LEDGER_FILE};
use divscan::provider::{CandleProvider, ProviderError, ProviderKind, ProviderSet};
use divscan::scanner::Scanner;
use divscan::symbols::SymbolEntry;
use divscan::worker::{CycleReport, Worker};
use fixtures::divergent_candles;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Serves a fixed series per code; unknown codes fail
#[derive(Default)]
struct MarketStub {
    series: Mutex<HashMap<String, CandleSeries>>,
}

impl MarketStub {
    fn set(&self, code: &str, series: CandleSeries) {
        self.series.lock().unwrap().insert(code.to_string(), series);
    }
}

#[async_trait]
impl CandleProvider for MarketStub {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Binance
    }

    async fn fetch(&self, code: &str, _timeframe: Timeframe) -> Result<CandleSeries, ProviderError> {
        self.series
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| ProviderError::Malformed(format!("no data for {code}")))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn first_bars(series: &CandleSeries, n: usize) -> CandleSeries {
    CandleSeries::new(series.candles()[..n].to_vec()).unwrap()
}

fn universe() -> Vec<SymbolEntry> {
    ["ETHTRY", "SOLTRY", "MISSINGTRY"]
        .into_iter()
        .map(|code| SymbolEntry::new(code, ProviderKind::Binance, code))
        .collect()
}

fn confirmed_hourly() -> ScannerConfig {
    ScannerConfig {
        timeframes: vec![Timeframe::OneHour],
        confirm_right: true,
        max_concurrency: 2,
        ..ScannerConfig::default()
    }
}

async fn worker(
    dir: &TempDir,
    market: Arc<MarketStub>,
    notifier: Arc<RecordingNotifier>,
) -> Worker {
    let mut providers = ProviderSet::new();
    providers.insert(market);
    let scanner = Scanner::new(providers, Config::default().divergence());
    let ledger = SentLedger::open(dir.path()).await.unwrap();
    let gate = NotificationGate::new(ledger, notifier);
    Worker::new(
        confirmed_hourly(),
        universe(),
        Arc::new(scanner),
        Arc::new(gate),
    )
}

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.validate().unwrap();
    assert_eq!(config.indicator.rsi_period, 14);
    assert_eq!(config.indicator.range_upper, 60);
    assert_eq!(config.scanner.timeframes, Timeframe::ALL.to_vec());
    assert!(!config.scanner.confirm_right);
    assert!(config.notifier.telegram_credentials().is_none());
}

#[test]
fn test_env_overrides_config_file() {
    let mut config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let env: HashMap<&str, &str> = [
        ("RSI_PERIOD", "21"),
        ("CONFIRM_RIGHT", "true"),
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "42"),
    ]
    .into_iter()
    .collect();
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.divergence().period, 21);
    assert!(config.scanner.confirm_right);
    assert_eq!(config.notifier.telegram_credentials(), Some(("123:abc", "42")));
}

#[tokio::test]
async fn test_first_cycle_seeds_then_only_new_signals_send() {
    let dir = TempDir::new().unwrap();
    let market = Arc::new(MarketStub::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let full = divergent_candles();
    market.set("ETHTRY", full.clone());
    // SOLTRY's low at bar 47 is not confirmed yet.
    market.set("SOLTRY", first_bars(&full, 53));

    let worker = worker(&dir, market.clone(), notifier.clone()).await;

    let seeded = worker.run_cycle(false).await;
    assert_eq!(
        seeded,
        CycleReport {
            scanned: 2,
            failed: 1,
            signals: 1,
            sent: 1,
            duplicates: 0,
        }
    );
    assert!(notifier.messages.lock().unwrap().is_empty());

    let repeat = worker.run_cycle(true).await;
    assert_eq!((repeat.sent, repeat.duplicates), (0, 1));
    assert!(notifier.messages.lock().unwrap().is_empty());

    // Five more bars close on SOLTRY and confirm its pivot.
    market.set("SOLTRY", first_bars(&full, 58));
    let fresh = worker.run_cycle(true).await;
    assert_eq!((fresh.signals, fresh.sent, fresh.duplicates), (2, 1, 1));

    let messages = notifier.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("*RSI Bullish Divergence*\nSOLTRY | 1h | 2024-03-02 23:00 UTC"));
}

#[tokio::test]
async fn test_ledger_suppresses_after_restart() {
    let dir = TempDir::new().unwrap();
    let market = Arc::new(MarketStub::default());
    market.set("ETHTRY", divergent_candles());

    let first_notifier = Arc::new(RecordingNotifier::default());
    let report = worker(&dir, market.clone(), first_notifier.clone())
        .await
        .run_cycle(true)
        .await;
    assert_eq!(report.sent, 1);
    assert_eq!(first_notifier.messages.lock().unwrap().len(), 1);

    let content = std::fs::read_to_string(dir.path().join(LEDGER_FILE)).unwrap();
    let ledger: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
    assert!(ledger.contains_key("ETHTRY:1h:2024-03-02T23:00:00+00:00"));

    let restarted_notifier = Arc::new(RecordingNotifier::default());
    let report = worker(&dir, market, restarted_notifier.clone())
        .await
        .run_cycle(true)
        .await;
    assert_eq!((report.sent, report.duplicates), (0, 1));
    assert!(restarted_notifier.messages.lock().unwrap().is_empty());
}
