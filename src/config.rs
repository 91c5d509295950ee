//! Configuration types for divscan

use crate::candle::Timeframe;
use crate::indicator::{DivergenceConfig, TieBreak};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub symbols: SymbolsConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// RSI and divergence settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorConfig {
    /// RSI period
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    /// Bars left of a pivot
    #[serde(default = "default_pivot_window")]
    pub pivot_left: usize,

    /// Bars right of a pivot
    #[serde(default = "default_pivot_window")]
    pub pivot_right: usize,

    /// Minimum bars between paired pivots
    #[serde(default = "default_range_lower")]
    pub range_lower: usize,

    /// Maximum bars between paired pivots
    #[serde(default = "default_range_upper")]
    pub range_upper: usize,

    #[serde(default)]
    pub tie_break: TieBreak,
}

fn default_rsi_period() -> usize {
    14
}
fn default_pivot_window() -> usize {
    5
}
fn default_range_lower() -> usize {
    5
}
fn default_range_upper() -> usize {
    60
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            pivot_left: default_pivot_window(),
            pivot_right: default_pivot_window(),
            range_lower: default_range_lower(),
            range_upper: default_range_upper(),
            tie_break: TieBreak::default(),
        }
    }
}

impl From<&IndicatorConfig> for DivergenceConfig {
    fn from(config: &IndicatorConfig) -> Self {
        DivergenceConfig {
            period: config.rsi_period,
            pivot_left: config.pivot_left,
            pivot_right: config.pivot_right,
            range_lower: config.range_lower,
            range_upper: config.range_upper,
            tie_break: config.tie_break,
        }
    }
}

/// Scan loop settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScannerConfig {
    #[serde(default = "default_timeframes")]
    pub timeframes: Vec<Timeframe>,

    /// Wait for the right pivot window to close before alerting
    #[serde(default)]
    pub confirm_right: bool,

    /// Target seconds between scan cycle starts
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum scans in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Record the first cycle's signals without sending them
    #[serde(default = "default_true")]
    pub seed_on_first_cycle: bool,
}

fn default_timeframes() -> Vec<Timeframe> {
    Timeframe::ALL.to_vec()
}
fn default_interval_secs() -> u64 {
    60
}
fn default_max_concurrency() -> usize {
    8
}
fn default_true() -> bool {
    true
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            timeframes: default_timeframes(),
            confirm_right: false,
            interval_secs: 60,
            max_concurrency: 8,
            seed_on_first_cycle: true,
        }
    }
}

/// Market data provider settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: f64,

    /// Maximum bars requested per series
    #[serde(default = "default_candle_limit")]
    pub candle_limit: usize,

    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,
}

fn default_request_timeout_secs() -> f64 {
    10.0
}
fn default_candle_limit() -> usize {
    1000
}
fn default_binance_base_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            candle_limit: default_candle_limit(),
            binance_base_url: default_binance_base_url(),
            yahoo_base_url: default_yahoo_base_url(),
        }
    }
}

/// Symbol list sources
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SymbolsConfig {
    #[serde(default = "default_bist_list_path")]
    pub bist_list_path: PathBuf,

    #[serde(default = "default_midas_list_path")]
    pub midas_list_path: PathBuf,

    #[serde(default = "default_max_symbols")]
    pub max_symbols_per_source: usize,
}

fn default_bist_list_path() -> PathBuf {
    PathBuf::from("BIST.txt")
}
fn default_midas_list_path() -> PathBuf {
    PathBuf::from("MIDAS.txt")
}
fn default_max_symbols() -> usize {
    1000
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            bist_list_path: default_bist_list_path(),
            midas_list_path: default_midas_list_path(),
            max_symbols_per_source: default_max_symbols(),
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    #[serde(default)]
    pub telegram_chat_id: Option<String>,

    /// Directory holding the sent-signal ledger
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            state_dir: default_state_dir(),
        }
    }
}

impl NotifierConfig {
    /// Bot token and chat id, when both are set and non-empty
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        let token = self.telegram_bot_token.as_deref().filter(|s| !s.is_empty())?;
        let chat = self.telegram_chat_id.as_deref().filter(|s| !s.is_empty())?;
        Some((token, chat))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus exporter port; disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply the scanner's environment variables on top of file values
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_parsed(&lookup, "RSI_PERIOD", &mut self.indicator.rsi_period);
        override_parsed(&lookup, "PIVOT_LEFT", &mut self.indicator.pivot_left);
        override_parsed(&lookup, "PIVOT_RIGHT", &mut self.indicator.pivot_right);
        override_parsed(&lookup, "RANGE_LOWER", &mut self.indicator.range_lower);
        override_parsed(&lookup, "RANGE_UPPER", &mut self.indicator.range_upper);
        override_parsed(&lookup, "SCAN_INTERVAL_SECS", &mut self.scanner.interval_secs);
        override_parsed(
            &lookup,
            "MAX_SYMBOLS_PER_SOURCE",
            &mut self.symbols.max_symbols_per_source,
        );
        override_parsed(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            &mut self.providers.request_timeout_secs,
        );

        if let Some(value) = lookup("CONFIRM_RIGHT") {
            self.scanner.confirm_right =
                matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(value) = lookup("STATE_DIR") {
            self.notifier.state_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("BIST_LIST_PATH") {
            self.symbols.bist_list_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("MIDAS_LIST_PATH") {
            self.symbols.midas_list_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("TELEGRAM_BOT_TOKEN") {
            self.notifier.telegram_bot_token = Some(value);
        }
        if let Some(value) = lookup("TELEGRAM_CHAT_ID") {
            self.notifier.telegram_chat_id = Some(value);
        }
    }

    /// Reject settings the scanner cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.indicator.rsi_period == 0 {
            anyhow::bail!("indicator.rsi_period must be positive");
        }
        if self.indicator.range_lower > self.indicator.range_upper {
            anyhow::bail!(
                "indicator.range_lower ({}) exceeds range_upper ({})",
                self.indicator.range_lower,
                self.indicator.range_upper
            );
        }
        if self.scanner.timeframes.is_empty() {
            anyhow::bail!("scanner.timeframes must not be empty");
        }
        if self.scanner.max_concurrency == 0 {
            anyhow::bail!("scanner.max_concurrency must be positive");
        }
        let timeout = self.providers.request_timeout_secs;
        if !(timeout.is_finite() && timeout > 0.0) {
            anyhow::bail!("providers.request_timeout_secs must be a positive number, got {timeout}");
        }
        Ok(())
    }

    pub fn divergence(&self) -> DivergenceConfig {
        DivergenceConfig::from(&self.indicator)
    }
}

fn override_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(key, value = %raw, "Ignoring unparseable override"),
    }
}
