//! Confirmed pivot detection
//!
//! A pivot at index `i` needs `left` bars before and `right` bars after it,
//! so the newest `right` bars of a series can never be pivots yet.

use serde::{Deserialize, Serialize};

/// Which occurrence of a tied extremum counts as the window's extremum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreak {
    /// Leftmost tied value wins; a center tied with an earlier bar is not a pivot
    #[default]
    #[serde(rename = "first")]
    FirstOccurrence,
    /// Rightmost tied value wins; a center tied with a later bar is not a pivot
    #[serde(rename = "last")]
    LastOccurrence,
}

/// Low and high pivot indices, ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pivots {
    pub lows: Vec<usize>,
    pub highs: Vec<usize>,
}

impl Pivots {
    pub fn is_empty(&self) -> bool {
        self.lows.is_empty() && self.highs.is_empty()
    }
}

/// Find pivots using the default [`TieBreak::FirstOccurrence`] rule
pub fn find_pivots(series: &[f64], left: usize, right: usize) -> Pivots {
    find_pivots_with(series, left, right, TieBreak::default())
}

/// Find pivots with an explicit tie-break rule.
///
/// Index `i` is a low pivot when the minimum of `series[i-left..=i+right]`
/// sits exactly at offset `left` under `tie_break`. Highs use the maximum.
/// Windows holding a non-finite value produce no pivot.
pub fn find_pivots_with(series: &[f64], left: usize, right: usize, tie_break: TieBreak) -> Pivots {
    let mut pivots = Pivots::default();
    let len = series.len();
    if left.saturating_add(right) >= len {
        return pivots;
    }

    for i in left..len - right {
        let window = &series[i - left..=i + right];
        if window.iter().any(|v| !v.is_finite()) {
            continue;
        }
        if extremum_offset(window, tie_break, |v, best| v < best) == left {
            pivots.lows.push(i);
        }
        if extremum_offset(window, tie_break, |v, best| v > best) == left {
            pivots.highs.push(i);
        }
    }
    pivots
}

/// Offset of the extremum in `window`, where `better(v, best)` is the strict order
fn extremum_offset(window: &[f64], tie_break: TieBreak, better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best_offset = 0;
    let mut best = window[0];
    for (offset, &value) in window.iter().enumerate().skip(1) {
        let replace = match tie_break {
            TieBreak::FirstOccurrence => better(value, best),
            TieBreak::LastOccurrence => !better(best, value),
        };
        if replace {
            best = value;
            best_offset = offset;
        }
    }
    best_offset
}
