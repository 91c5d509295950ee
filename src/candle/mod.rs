//! Candle series module
//!
//! Time-ordered OHLCV bars and the timeframes the scanner works on

mod resample;
mod types;

pub use resample::resample_ohlcv;
pub use types::{Candle, CandleError, CandleSeries, Timeframe};
