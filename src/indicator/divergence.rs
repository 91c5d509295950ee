//! Regular bullish divergence detection
//!
//! Pairs each RSI low pivot with the pivot right before it. A pair emits a
//! signal when price made a lower low while RSI made a higher low and the
//! two pivots sit within the configured bar-distance window.

use super::pivot::{find_pivots_with, TieBreak};
use super::rsi::compute_rsi;
use super::types::DivergenceSignal;
use crate::candle::{CandleSeries, Timeframe};
use chrono::{DateTime, Utc};

/// Configuration for divergence detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivergenceConfig {
    /// RSI period (default: 14)
    pub period: usize,
    /// Bars left of a pivot (default: 5)
    pub pivot_left: usize,
    /// Bars right of a pivot (default: 5)
    pub pivot_right: usize,
    /// Minimum bar distance between paired pivots (default: 5)
    pub range_lower: usize,
    /// Maximum bar distance between paired pivots (default: 60)
    pub range_upper: usize,
    /// Which tied RSI value counts as the window low (default: first)
    pub tie_break: TieBreak,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            period: 14,
            pivot_left: 5,
            pivot_right: 5,
            range_lower: 5,
            range_upper: 60,
            tie_break: TieBreak::FirstOccurrence,
        }
    }
}

impl DivergenceConfig {
    /// Same configuration with a different right-hand pivot window
    pub fn with_right(self, pivot_right: usize) -> Self {
        Self {
            pivot_right,
            ..self
        }
    }

    fn in_range(&self, distance: usize) -> bool {
        self.range_lower <= distance && distance <= self.range_upper
    }
}

/// Stateless divergence detector
#[derive(Debug, Clone, Default)]
pub struct DivergenceDetector {
    config: DivergenceConfig,
}

impl DivergenceDetector {
    pub fn new(config: DivergenceConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DivergenceConfig::default())
    }

    pub fn config(&self) -> &DivergenceConfig {
        &self.config
    }

    /// Compute RSI from the closes and run [`Self::detect`] against the lows
    pub fn detect_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        series: &CandleSeries,
    ) -> Vec<DivergenceSignal> {
        if series.is_empty() {
            return Vec::new();
        }
        let rsi = compute_rsi(&series.closes(), self.config.period);
        self.detect(symbol, timeframe, &rsi, &series.lows(), &series.timestamps())
    }

    /// Match adjacent oscillator low pivots.
    ///
    /// All three slices must be aligned bar for bar. Signals come back in
    /// ascending order of the later pivot.
    pub fn detect(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        oscillator: &[f64],
        price_low: &[f64],
        bar_times: &[DateTime<Utc>],
    ) -> Vec<DivergenceSignal> {
        if oscillator.len() != price_low.len() || oscillator.len() != bar_times.len() {
            tracing::warn!(
                symbol,
                timeframe = %timeframe,
                oscillator_len = oscillator.len(),
                price_len = price_low.len(),
                time_len = bar_times.len(),
                "Misaligned divergence input, skipping"
            );
            return Vec::new();
        }

        let pivots = find_pivots_with(
            oscillator,
            self.config.pivot_left,
            self.config.pivot_right,
            self.config.tie_break,
        );

        // A pivot with an undefined RSI or low cannot be compared, so it is
        // dropped before pairing.
        let lows: Vec<usize> = pivots
            .lows
            .into_iter()
            .filter(|&i| oscillator[i].is_finite() && price_low[i].is_finite())
            .collect();
        if lows.len() < 2 {
            return Vec::new();
        }

        lows.windows(2)
            .filter_map(|pair| {
                let (prev, curr) = (pair[0], pair[1]);
                if !self.config.in_range(curr - prev) {
                    return None;
                }
                let rsi_higher_low = oscillator[curr] > oscillator[prev];
                let price_lower_low = price_low[curr] < price_low[prev];
                if !(rsi_higher_low && price_lower_low) {
                    return None;
                }
                Some(DivergenceSignal {
                    symbol: symbol.to_string(),
                    timeframe,
                    bar_time: bar_times[curr],
                    rsi_at_pivot: oscillator[curr],
                    price_at_pivot: price_low[curr],
                    prev_rsi_pivot: oscillator[prev],
                    prev_price_pivot: price_low[prev],
                    bar_index: curr,
                    prev_bar_index: prev,
                })
            })
            .collect()
    }
}
