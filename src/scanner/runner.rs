//! Per-symbol scan

use super::policy::{apply_bar_policy, ScanMode};
use crate::candle::{CandleSeries, Timeframe};
use crate::indicator::{DivergenceConfig, DivergenceDetector, DivergenceSignal};
use crate::provider::{ProviderError, ProviderKind, ProviderSet};
use crate::symbols::SymbolEntry;
use thiserror::Error;

/// Scan errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// No provider registered for the symbol's source
    #[error("No provider registered for {0}")]
    UnknownProvider(ProviderKind),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Fetches a series and runs divergence detection on its closed bars
pub struct Scanner {
    providers: ProviderSet,
    config: DivergenceConfig,
}

impl Scanner {
    pub fn new(providers: ProviderSet, config: DivergenceConfig) -> Self {
        Self { providers, config }
    }

    pub fn config(&self) -> &DivergenceConfig {
        &self.config
    }

    /// Run detection on an already fetched series
    pub fn scan_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        series: &CandleSeries,
        mode: ScanMode,
    ) -> Vec<DivergenceSignal> {
        let (closed, right) = apply_bar_policy(series, mode, self.config.pivot_right);
        if closed.is_empty() {
            return Vec::new();
        }
        DivergenceDetector::new(self.config.with_right(right)).detect_series(symbol, timeframe, &closed)
    }

    /// Fetch and scan one symbol
    pub async fn scan(
        &self,
        entry: &SymbolEntry,
        timeframe: Timeframe,
        mode: ScanMode,
    ) -> Result<Vec<DivergenceSignal>, ScanError> {
        let provider = self
            .providers
            .get(entry.provider)
            .ok_or(ScanError::UnknownProvider(entry.provider))?;
        let series = provider.fetch(&entry.code, timeframe).await?;

        let signals = self.scan_series(&entry.display, timeframe, &series, mode);
        tracing::debug!(
            symbol = %entry.display,
            provider = %entry.provider,
            timeframe = %timeframe,
            bars = series.len(),
            signals = signals.len(),
            "Scanned series"
        );
        Ok(signals)
    }
}
