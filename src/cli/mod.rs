//! CLI interface for divscan
//!
//! Provides subcommands for:
//! - `run`: Start the scan loop
//! - `scan`: One-shot scan of a single symbol
//! - `symbols`: Show the loaded symbol universe
//! - `config`: Show the effective configuration

mod run;
mod scan;
mod symbols;

pub use run::RunArgs;
pub use scan::ScanArgs;
pub use symbols::SymbolsArgs;

use crate::config::Config;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "divscan")]
#[command(about = "RSI bullish divergence scanner for BIST equities and Midas TRY pairs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the scan loop
    Run(RunArgs),
    /// Scan one symbol and print its signals as JSON lines
    Scan(ScanArgs),
    /// Show the loaded symbol universe
    Symbols(SymbolsArgs),
    /// Show the effective configuration
    Config,
}

/// Effective configuration as TOML with the bot token masked
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    let mut shown = config.clone();
    if shown.notifier.telegram_bot_token.is_some() {
        shown.notifier.telegram_bot_token = Some("***".to_string());
    }
    Ok(toml::to_string_pretty(&shown)?)
}
