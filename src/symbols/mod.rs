//! Symbol universe module
//!
//! Turns the BIST and Midas text lists into provider-specific symbol codes

mod loader;

pub use loader::{load_symbol_universe, parse_bist_symbols, parse_midas_symbols, SymbolError};

use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};

/// One scannable symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Name shown in alerts and used in dedup keys
    pub display: String,
    pub provider: ProviderKind,
    /// Provider-specific code, e.g. `AKBNK.IS` or `BTCTRY`
    pub code: String,
}

impl SymbolEntry {
    pub fn new(display: impl Into<String>, provider: ProviderKind, code: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            provider,
            code: code.into(),
        }
    }
}
