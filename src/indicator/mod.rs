//! Indicator module
//!
//! RSI oscillator, confirmed pivots, and regular bullish divergence matching.
//! Everything here is pure: each call reads its own input and allocates
//! fresh output, so scans for different series can run in parallel.

mod divergence;
mod pivot;
mod rsi;
mod types;

pub use divergence::{DivergenceConfig, DivergenceDetector};
pub use pivot::{find_pivots, find_pivots_with, Pivots, TieBreak};
pub use rsi::{compute_rsi, NEUTRAL_RSI};
pub use types::DivergenceSignal;
