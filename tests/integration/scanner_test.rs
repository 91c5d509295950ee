//! Closed-bar policy and per-symbol scans

mod fixtures;

use async_trait::async_trait;
use chrono::Duration;
use divscan::candle::{CandleSeries, Timeframe};
use divscan::indicator::DivergenceConfig;
use divscan::provider::{CandleProvider, ProviderError, ProviderKind, ProviderSet};
use divscan::scanner::{apply_bar_policy, ScanError, ScanMode, Scanner};
use divscan::symbols::SymbolEntry;
use fixtures::{divergent_candles, fresh_low_candles, start};
use std::sync::Arc;

struct StaticProvider {
    kind: ProviderKind,
    series: CandleSeries,
}

#[async_trait]
impl CandleProvider for StaticProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, _code: &str, _timeframe: Timeframe) -> Result<CandleSeries, ProviderError> {
        Ok(self.series.clone())
    }
}

fn scanner_with(kind: ProviderKind, series: CandleSeries) -> Scanner {
    let mut providers = ProviderSet::new();
    providers.insert(Arc::new(StaticProvider { kind, series }));
    Scanner::new(providers, DivergenceConfig::default())
}

#[test]
fn test_policy_trims_tail() {
    let series = divergent_candles();

    let (confirmed, right) = apply_bar_policy(&series, ScanMode::Confirmed, 5);
    assert_eq!((confirmed.len(), right), (63, 5));

    let (immediate, right) = apply_bar_policy(&series, ScanMode::Immediate, 5);
    assert_eq!((immediate.len(), right), (67, 0));
    assert_eq!(immediate.last(), series.candles().get(66));
}

#[test]
fn test_confirmed_waits_for_right_window() {
    let scanner = Scanner::new(ProviderSet::new(), DivergenceConfig::default());
    let series = divergent_candles();

    let signals = scanner.scan_series("ETHTRY", Timeframe::OneHour, &series, ScanMode::Confirmed);
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].bar_index, 47);
    assert_eq!(signals[0].bar_time, start() + Duration::hours(47));

    // Ending at bar 52 leaves bar 47 without five closed bars to its right.
    let early = CandleSeries::new(series.candles()[..53].to_vec()).unwrap();
    assert!(scanner
        .scan_series("ETHTRY", Timeframe::OneHour, &early, ScanMode::Confirmed)
        .is_empty());

    // Bar 57 is the first end where the pivot is confirmed.
    let ready = CandleSeries::new(series.candles()[..58].to_vec()).unwrap();
    assert_eq!(
        scanner
            .scan_series("ETHTRY", Timeframe::OneHour, &ready, ScanMode::Confirmed)
            .len(),
        1
    );
}

#[test]
fn test_immediate_alerts_on_fresh_low() {
    let scanner = Scanner::new(ProviderSet::new(), DivergenceConfig::default());
    let series = fresh_low_candles();

    let immediate = scanner.scan_series("BTCTRY", Timeframe::OneHour, &series, ScanMode::Immediate);
    assert_eq!(immediate.len(), 1);
    assert_eq!((immediate[0].prev_bar_index, immediate[0].bar_index), (29, 41));
    assert!(immediate[0].rsi_at_pivot > immediate[0].prev_rsi_pivot);

    assert!(scanner
        .scan_series("BTCTRY", Timeframe::OneHour, &series, ScanMode::Confirmed)
        .is_empty());
}

#[test]
fn test_immediate_ignores_gradual_legs() {
    // With no right window every bar of a falling RSI leg is a pivot, so
    // adjacent pivots are one bar apart and fall outside the distance window.
    let scanner = Scanner::new(ProviderSet::new(), DivergenceConfig::default());
    let signals = scanner.scan_series(
        "ETHTRY",
        Timeframe::OneHour,
        &divergent_candles(),
        ScanMode::Immediate,
    );
    assert!(signals.is_empty());
}

#[tokio::test]
async fn test_scan_fetches_from_matching_provider() {
    let scanner = scanner_with(ProviderKind::Yahoo, divergent_candles());
    let entry = SymbolEntry::new("AKBNK.IS", ProviderKind::Yahoo, "AKBNK.IS");

    let signals = scanner
        .scan(&entry, Timeframe::OneDay, ScanMode::Confirmed)
        .await
        .unwrap();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].symbol, "AKBNK.IS");
    assert_eq!(signals[0].timeframe, Timeframe::OneDay);
}

#[tokio::test]
async fn test_scan_without_provider_fails() {
    let scanner = scanner_with(ProviderKind::Yahoo, divergent_candles());
    let entry = SymbolEntry::new("BTCTRY", ProviderKind::Binance, "BTCTRY");

    let err = scanner
        .scan(&entry, Timeframe::OneHour, ScanMode::Immediate)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::UnknownProvider(ProviderKind::Binance)));
}

#[tokio::test]
async fn test_scan_of_short_series_is_empty() {
    let scanner = scanner_with(ProviderKind::Binance, divergent_candles().tail(4));
    let entry = SymbolEntry::new("BTCTRY", ProviderKind::Binance, "BTCTRY");

    for mode in [ScanMode::Immediate, ScanMode::Confirmed] {
        let signals = scanner.scan(&entry, Timeframe::OneHour, mode).await.unwrap();
        assert!(signals.is_empty());
    }
}
