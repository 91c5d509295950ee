//! Scan command implementation

use crate::candle::Timeframe;
use crate::config::Config;
use crate::provider::{ProviderKind, ProviderSet};
use crate::scanner::{ScanMode, Scanner};
use crate::symbols::SymbolEntry;
use clap::Args;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Data source: binance or yahoo
    #[arg(long)]
    pub provider: ProviderKind,

    /// Provider symbol code, e.g. BTCTRY or AKBNK.IS
    #[arg(long)]
    pub code: String,

    /// Timeframe: 1h, 4h, 1d or 1w
    #[arg(long, default_value = "1d")]
    pub timeframe: Timeframe,

    /// Only report pivots with a closed right window
    #[arg(long)]
    pub confirm: bool,

    /// Print every signal in the series, not just the newest
    #[arg(long)]
    pub all: bool,
}

impl ScanArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let providers = ProviderSet::from_config(&config.providers)?;
        let scanner = Scanner::new(providers, config.divergence());
        let entry = SymbolEntry::new(self.code.clone(), self.provider, self.code.clone());
        let mode = if self.confirm {
            ScanMode::Confirmed
        } else {
            ScanMode::from_confirm(config.scanner.confirm_right)
        };

        let signals = scanner.scan(&entry, self.timeframe, mode).await?;
        tracing::info!(
            code = %self.code,
            timeframe = %self.timeframe,
            ?mode,
            signals = signals.len(),
            "Scan finished"
        );

        let shown = if self.all {
            &signals[..]
        } else {
            &signals[signals.len().saturating_sub(1)..]
        };
        for signal in shown {
            println!("{}", serde_json::to_string(signal)?);
        }
        Ok(())
    }
}
