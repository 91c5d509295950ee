//! Symbols command implementation

use crate::config::Config;
use crate::symbols::load_symbol_universe;
use clap::Args;

#[derive(Args, Debug)]
pub struct SymbolsArgs {
    /// Print JSON lines instead of a table
    #[arg(long)]
    pub json: bool,
}

impl SymbolsArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let universe = load_symbol_universe(&config.symbols)?;
        for entry in &universe {
            if self.json {
                println!("{}", serde_json::to_string(entry)?);
            } else {
                println!("{:<16} {:<8} {}", entry.display, entry.provider, entry.code);
            }
        }
        if !self.json {
            println!("{} symbols", universe.len());
        }
        Ok(())
    }
}
