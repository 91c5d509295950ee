//! Divergence detection through the public API

mod fixtures;

use chrono::Duration;
use divscan::candle::Timeframe;
use divscan::indicator::{compute_rsi, find_pivots, DivergenceConfig, DivergenceDetector};
use fixtures::{bar_times, divergent_candles, start};

/// Flat line at `base` with single-bar dips
fn flat_with_dips(len: usize, base: f64, dips: &[(usize, f64)]) -> Vec<f64> {
    let mut values = vec![base; len];
    for &(i, value) in dips {
        values[i] = value;
    }
    values
}

#[test]
fn test_candle_series_pipeline() {
    let series = divergent_candles();
    let rsi = compute_rsi(&series.closes(), 14);
    assert_eq!(find_pivots(&rsi, 5, 5).lows, vec![29, 47]);

    let signals = DivergenceDetector::with_defaults().detect_series("ETHTRY", Timeframe::OneHour, &series);
    assert_eq!(signals.len(), 1);

    let signal = &signals[0];
    assert_eq!(signal.symbol, "ETHTRY");
    assert_eq!(signal.prev_bar_index, 29);
    assert_eq!(signal.bar_index, 47);
    assert_eq!(signal.bar_time, start() + Duration::hours(47));
    assert!(signal.rsi_at_pivot > signal.prev_rsi_pivot);
    assert!(signal.price_at_pivot < signal.prev_price_pivot);
    assert!((signal.price_at_pivot - 77.5).abs() < 1e-6);
    assert!((signal.prev_price_pivot - 80.5).abs() < 1e-6);
    assert!((signal.rsi_at_pivot - 21.347_772_966).abs() < 1e-6);
    assert!((signal.prev_rsi_pivot - 6.737_464_356).abs() < 1e-6);
}

#[test]
fn test_eighty_bar_scenario() {
    let oscillator = flat_with_dips(80, 50.0, &[(10, 30.0), (40, 45.0)]);
    let lows = flat_with_dips(80, 120.0, &[(10, 100.0), (40, 95.0)]);
    let signals = DivergenceDetector::with_defaults().detect(
        "AKBNK.IS",
        Timeframe::OneDay,
        &oscillator,
        &lows,
        &bar_times(80),
    );

    assert_eq!(signals.len(), 1);
    let signal = &signals[0];
    assert_eq!((signal.prev_bar_index, signal.bar_index), (10, 40));
    assert_eq!(signal.prev_rsi_pivot, 30.0);
    assert_eq!(signal.rsi_at_pivot, 45.0);
    assert_eq!(signal.prev_price_pivot, 100.0);
    assert_eq!(signal.price_at_pivot, 95.0);
    assert_eq!(signal.bars_between(), 30);
}

#[test]
fn test_lower_rsi_low_is_not_bullish() {
    let oscillator = flat_with_dips(80, 50.0, &[(10, 30.0), (40, 25.0)]);
    let lows = flat_with_dips(80, 120.0, &[(10, 100.0), (40, 95.0)]);
    let signals = DivergenceDetector::with_defaults().detect(
        "X",
        Timeframe::OneDay,
        &oscillator,
        &lows,
        &bar_times(80),
    );
    assert!(signals.is_empty());
}

#[test]
fn test_distance_window_edges() {
    let detector = DivergenceDetector::new(DivergenceConfig {
        range_lower: 8,
        range_upper: 20,
        ..DivergenceConfig::default()
    });
    let run = |distance: usize| {
        let second = 10 + distance;
        let oscillator = flat_with_dips(60, 50.0, &[(10, 30.0), (second, 40.0)]);
        let lows = flat_with_dips(60, 120.0, &[(10, 100.0), (second, 90.0)]);
        detector
            .detect("X", Timeframe::OneHour, &oscillator, &lows, &bar_times(60))
            .len()
    };

    assert_eq!(run(7), 0);
    assert_eq!(run(8), 1);
    assert_eq!(run(20), 1);
    assert_eq!(run(21), 0);
}

#[test]
fn test_only_adjacent_pivots_pair() {
    // 10 -> 30 fails (price higher), 30 -> 50 fails (RSI lower). The
    // 10 -> 50 pair would qualify but is never compared.
    let oscillator = flat_with_dips(70, 50.0, &[(10, 30.0), (30, 45.0), (50, 35.0)]);
    let lows = flat_with_dips(70, 120.0, &[(10, 100.0), (30, 105.0), (50, 90.0)]);
    let signals = DivergenceDetector::with_defaults().detect(
        "X",
        Timeframe::OneWeek,
        &oscillator,
        &lows,
        &bar_times(70),
    );
    assert!(signals.is_empty());
}

#[test]
fn test_detection_is_repeatable() {
    let series = divergent_candles();
    let detector = DivergenceDetector::with_defaults();
    let first = detector.detect_series("X", Timeframe::FourHours, &series);
    let second = detector.detect_series("X", Timeframe::FourHours, &series);
    assert_eq!(first, second);
}

#[test]
fn test_short_series_has_no_signals() {
    let series = divergent_candles().tail(10);
    assert!(DivergenceDetector::with_defaults()
        .detect_series("X", Timeframe::OneHour, &series)
        .is_empty());
}
