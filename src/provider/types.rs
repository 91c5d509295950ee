//! Provider types

use crate::candle::CandleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Market data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Binance,
    Yahoo,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Binance => "binance",
            ProviderKind::Yahoo => "yahoo",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binance" => Ok(ProviderKind::Binance),
            "yahoo" => Ok(ProviderKind::Yahoo),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure or client construction failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Response body was not the expected JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// Response decoded but a row could not be used
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// Bars were not in strictly increasing time order
    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] CandleError),
}
