//! Divergence signal types

use crate::candle::Timeframe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A regular bullish divergence between two adjacent RSI low pivots.
///
/// Price printed a lower low at `bar_time` while the RSI printed a higher low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSignal {
    /// Display symbol the series belongs to
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Open time of the later pivot bar
    pub bar_time: DateTime<Utc>,
    /// RSI at the later pivot
    pub rsi_at_pivot: f64,
    /// Bar low at the later pivot
    pub price_at_pivot: f64,
    /// RSI at the earlier pivot
    pub prev_rsi_pivot: f64,
    /// Bar low at the earlier pivot
    pub prev_price_pivot: f64,
    /// Index of the later pivot in the scanned series
    pub bar_index: usize,
    /// Index of the earlier pivot in the scanned series
    pub prev_bar_index: usize,
}

impl DivergenceSignal {
    /// Bar distance between the two pivots
    pub fn bars_between(&self) -> usize {
        self.bar_index - self.prev_bar_index
    }
}
