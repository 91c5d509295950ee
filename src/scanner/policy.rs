//! Closed-bar and confirmation policy

use crate::candle::CandleSeries;
use serde::{Deserialize, Serialize};

/// How much of the live tail a scan trusts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Alert on the last closed bar with no right-hand confirmation
    #[default]
    Immediate,
    /// Wait until the full right pivot window has printed
    Confirmed,
}

impl ScanMode {
    pub fn from_confirm(confirm: bool) -> Self {
        if confirm {
            ScanMode::Confirmed
        } else {
            ScanMode::Immediate
        }
    }
}

/// Trim the live tail and pick the right pivot window for `mode`.
///
/// Confirmed drops the last `right` bars and keeps `right`. Immediate drops
/// only the newest, possibly still forming, bar and uses a right window of 0.
/// A series too short to trim is returned whole.
pub fn apply_bar_policy(series: &CandleSeries, mode: ScanMode, right: usize) -> (CandleSeries, usize) {
    match mode {
        ScanMode::Confirmed => {
            let trimmed = if series.len() > right {
                series.truncate_tail(right)
            } else {
                series.clone()
            };
            (trimmed, right)
        }
        ScanMode::Immediate => {
            let trimmed = if series.len() > 1 {
                series.truncate_tail(1)
            } else {
                series.clone()
            };
            (trimmed, 0)
        }
    }
}
