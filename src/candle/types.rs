//! Candle types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time (UTC)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// True when every price and the volume are finite
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }
}

/// Candle series errors
#[derive(Debug, Error, PartialEq)]
pub enum CandleError {
    /// Two bars out of order or sharing a timestamp
    #[error("Timestamps not strictly increasing at index {index}: {previous} >= {current}")]
    NotIncreasing {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

/// Time-ordered candle series with strictly increasing timestamps.
///
/// Index position is the unit of bar distance for pivots and divergence
/// windows; gaps in wall-clock time are not reasoned about.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, rejecting out-of-order or duplicate timestamps
    pub fn new(candles: Vec<Candle>) -> Result<Self, CandleError> {
        for (index, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(CandleError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }
        Ok(Self { candles })
    }

    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.candles.iter().map(|c| c.timestamp).collect()
    }

    /// Drop the last `n` bars (saturating)
    pub fn truncate_tail(&self, n: usize) -> Self {
        let keep = self.candles.len().saturating_sub(n);
        Self {
            candles: self.candles[..keep].to_vec(),
        }
    }

    /// Keep only the last `n` bars
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.candles.len().saturating_sub(n);
        Self {
            candles: self.candles[skip..].to_vec(),
        }
    }
}

/// Scan timeframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Timeframe {
    /// Every supported timeframe, shortest first
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::OneWeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
        }
    }

    /// Bar length in minutes
    pub fn minutes(&self) -> i64 {
        match self {
            Timeframe::OneHour => 60,
            Timeframe::FourHours => 240,
            Timeframe::OneDay => 60 * 24,
            Timeframe::OneWeek => 60 * 24 * 7,
        }
    }

    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.minutes())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Ok(Timeframe::OneHour),
            "4h" => Ok(Timeframe::FourHours),
            "1d" => Ok(Timeframe::OneDay),
            "1w" => Ok(Timeframe::OneWeek),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}
