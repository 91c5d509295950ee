//! Worker module
//!
//! The long-running scan loop: one scan per (symbol, timeframe) per cycle,
//! failures isolated per symbol, fixed cadence between cycle starts

mod poller;

pub use poller::{cadence_sleep, CycleReport, Worker};
