//! Candle provider module
//!
//! Fetches OHLC series from Binance (crypto pairs) and Yahoo Finance (BIST equities)

mod binance;
mod types;
mod yahoo;

pub use binance::BinanceProvider;
pub use types::{ProviderError, ProviderKind};
pub use yahoo::YahooProvider;

use crate::candle::{CandleSeries, Timeframe};
use crate::config::ProvidersConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for candle provider implementations
#[async_trait]
pub trait CandleProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Fetch the most recent bars for a provider-specific code.
    ///
    /// Unknown symbols and rejected requests come back as an empty series;
    /// errors are reserved for transport and decoding failures.
    async fn fetch(&self, code: &str, timeframe: Timeframe) -> Result<CandleSeries, ProviderError>;
}

/// Providers keyed by kind
#[derive(Clone, Default)]
pub struct ProviderSet {
    providers: HashMap<ProviderKind, Arc<dyn CandleProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the Binance and Yahoo providers from config
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let mut set = Self::new();
        set.insert(Arc::new(BinanceProvider::new(config)?));
        set.insert(Arc::new(YahooProvider::new(config)?));
        Ok(set)
    }

    pub fn insert(&mut self, provider: Arc<dyn CandleProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn CandleProvider>> {
        self.providers.get(&kind).cloned()
    }
}
