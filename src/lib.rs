//! divscan: RSI bullish divergence scanner for BIST equities and Midas TRY pairs
//!
//! This library provides the core components for:
//! - Candle series and 4h resampling
//! - RSI, pivot detection and divergence matching
//! - Closed-bar and confirmation policy
//! - Candle providers for Binance and Yahoo Finance
//! - Symbol universe loading
//! - Deduplicated Telegram alerts
//! - The fixed-cadence scan loop
//! - Logging and Prometheus metrics

pub mod candle;
pub mod cli;
pub mod config;
pub mod indicator;
pub mod notify;
pub mod provider;
pub mod scanner;
pub mod symbols;
pub mod telemetry;
pub mod worker;
