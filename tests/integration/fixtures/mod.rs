//! Candle fixtures shared by the integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use divscan::candle::{Candle, CandleSeries};

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

pub fn bar_times(len: usize) -> Vec<DateTime<Utc>> {
    (0..len).map(|i| start() + Duration::hours(i as i64)).collect()
}

/// Hourly candles with lows half a point under the close
pub fn candles_from_closes(closes: &[f64]) -> CandleSeries {
    let candles = closes
        .iter()
        .zip(bar_times(closes.len()))
        .map(|(&close, timestamp)| Candle {
            timestamp,
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 10.0,
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

/// 20 bars of chop from 100, then `(bars, step)` legs
fn closes_with_legs(legs: &[(usize, f64)]) -> Vec<f64> {
    let mut closes = Vec::new();
    let mut price: f64 = 100.0;
    for i in 0..20 {
        price += if i % 2 == 0 { 0.5 } else { -0.4 };
        closes.push(price);
    }
    for &(bars, step) in legs {
        for _ in 0..bars {
            price += step;
            closes.push(price);
        }
    }
    closes
}

/// 68 bars: a sharp drop to bar 29, a bounce, a slower drop to a lower
/// low at bar 47, then a 20 bar recovery.
///
/// RSI low pivots (5/5) sit at 29 and 47 and form one bullish divergence.
pub fn divergent_candles() -> CandleSeries {
    candles_from_closes(&closes_with_legs(&[(10, -2.0), (6, 1.5), (12, -1.0), (20, 1.0)]))
}

/// 45 bars: the same first drop, a bounce, then a one-bar plunge to a lower
/// low at bar 41 followed by three up bars.
///
/// Only the immediate policy sees the bar 41 low; it has no five-bar right
/// window yet.
pub fn fresh_low_candles() -> CandleSeries {
    candles_from_closes(&closes_with_legs(&[
        (10, -2.0),
        (6, 1.5),
        (5, 0.2),
        (1, -11.0),
        (3, 0.5),
    ]))
}
