//! Scanner module
//!
//! Applies the closed-bar policy and runs divergence detection for one
//! (symbol, timeframe) pair

mod policy;
mod runner;

pub use policy::{apply_bar_policy, ScanMode};
pub use runner::{ScanError, Scanner};
