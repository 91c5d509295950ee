//! Symbol list parsing

use super::SymbolEntry;
use crate::config::SymbolsConfig;
use crate::provider::ProviderKind;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// BIST tickers, Turkish capitals included
static BIST_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-ZÇĞİÖŞÜ0-9]{3,6}").expect("valid BIST token pattern"));

/// Midas pair candidates before the TRY filter
static MIDAS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Z0-9]{3,12}").expect("valid Midas token pattern"));

/// Tokens in the BIST list that are not tickers
const BIST_EXCLUDES: [&str; 3] = ["ALTIN", "XU100", "XU500"];

/// Liquid TRY pairs scanned first
const MIDAS_PRIORITY: [&str; 10] = [
    "BTCTRY", "ETHTRY", "BNBTRY", "SOLTRY", "ADATRY", "XRPTRY", "AVAXTRY", "DOTTRY", "LINKTRY",
    "LTCTRY",
];

/// Symbol loading errors
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("Failed to read symbol list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn dedup_in_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Parse BIST tickers into Yahoo codes (`AKBNK` -> `AKBNK.IS`)
pub fn parse_bist_symbols(text: &str, max: usize) -> Vec<String> {
    let raw = BIST_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|t| !BIST_EXCLUDES.contains(t))
        .map(str::to_string);
    dedup_in_order(raw)
        .into_iter()
        .take(max)
        .map(|t| format!("{t}.IS"))
        .collect()
}

/// Parse Midas TRY pairs, majors first
pub fn parse_midas_symbols(text: &str, max: usize) -> Vec<String> {
    let pairs = dedup_in_order(
        MIDAS_TOKEN
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| t.ends_with("TRY"))
            .map(str::to_string),
    );

    let mut ordered: Vec<String> = MIDAS_PRIORITY
        .iter()
        .filter(|p| pairs.iter().any(|t| t == *p))
        .map(|p| p.to_string())
        .collect();
    for pair in pairs {
        if !ordered.contains(&pair) {
            ordered.push(pair);
        }
    }
    ordered.truncate(max);
    ordered
}

/// Read a list file; a missing file is an empty list
fn read_list(path: &Path) -> Result<String, SymbolError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Symbol list not found, skipping");
            Ok(String::new())
        }
        Err(source) => Err(SymbolError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Build the unified universe from both lists, sorted by display name.
///
/// Later sources win when two entries share a display name.
pub fn load_symbol_universe(config: &SymbolsConfig) -> Result<Vec<SymbolEntry>, SymbolError> {
    let bist = parse_bist_symbols(&read_list(&config.bist_list_path)?, config.max_symbols_per_source);
    let midas = parse_midas_symbols(
        &read_list(&config.midas_list_path)?,
        config.max_symbols_per_source,
    );

    let mut universe: BTreeMap<String, SymbolEntry> = BTreeMap::new();
    for code in bist {
        universe.insert(code.clone(), SymbolEntry::new(code.clone(), ProviderKind::Yahoo, code));
    }
    for code in midas {
        universe.insert(code.clone(), SymbolEntry::new(code.clone(), ProviderKind::Binance, code));
    }

    tracing::info!(count = universe.len(), "Loaded symbol universe");
    Ok(universe.into_values().collect())
}
