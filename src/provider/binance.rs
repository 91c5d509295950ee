//! Binance REST kline provider

use super::{CandleProvider, ProviderError, ProviderKind};
use crate::candle::{Candle, CandleSeries, Timeframe};
use crate::config::ProvidersConfig;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Binance exchangeInfo response, symbols only
#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    #[serde(default)]
    symbols: Vec<ExchangeSymbol>,
}

#[derive(Debug, Deserialize)]
struct ExchangeSymbol {
    #[serde(default)]
    symbol: String,
}

/// Binance klines for TRY and USDT spot pairs
pub struct BinanceProvider {
    base_url: String,
    limit: usize,
    client: Client,
    /// Tradable symbols, loaded once on first successful exchangeInfo call
    symbols: OnceCell<HashSet<String>>,
}

impl BinanceProvider {
    pub fn new(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.binance_base_url.trim_end_matches('/').to_string(),
            limit: config.candle_limit,
            client,
            symbols: OnceCell::new(),
        })
    }

    /// Binance interval names match the timeframe strings
    fn interval(timeframe: Timeframe) -> &'static str {
        timeframe.as_str()
    }

    async fn load_exchange_symbols(&self) -> Result<HashSet<String>, ProviderError> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let info: ExchangeInfo = serde_json::from_str(&body)?;
        let symbols: HashSet<String> = info.symbols.into_iter().map(|s| s.symbol).collect();
        tracing::info!(count = symbols.len(), "Loaded Binance symbol set");
        Ok(symbols)
    }

    /// Exchange symbol set, or None when it could not be loaded
    async fn known_symbols(&self) -> Option<&HashSet<String>> {
        match self
            .symbols
            .get_or_try_init(|| self.load_exchange_symbols())
            .await
        {
            Ok(symbols) => Some(symbols),
            Err(e) => {
                tracing::warn!(error = %e, "Binance exchangeInfo unavailable, skipping symbol check");
                None
            }
        }
    }

    /// Map a requested code to a listed symbol.
    ///
    /// Without a symbol set every code is passed through. A delisted TRY pair
    /// falls back to its USDT pair; None means neither is listed.
    fn resolve_symbol(code: &str, known: Option<&HashSet<String>>) -> Option<String> {
        let symbol = code.trim().to_uppercase();
        let Some(known) = known.filter(|k| !k.is_empty()) else {
            return Some(symbol);
        };
        if known.contains(&symbol) {
            return Some(symbol);
        }
        let fallback = match symbol.strip_suffix("TRY") {
            Some(base) => format!("{base}USDT"),
            None => symbol,
        };
        known.contains(&fallback).then_some(fallback)
    }

    /// Parse the klines array-of-arrays payload
    fn parse_klines(body: &str) -> Result<CandleSeries, ProviderError> {
        let rows: Vec<Vec<Value>> = serde_json::from_str(body)?;
        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            if row.len() < 6 {
                return Err(ProviderError::Malformed(format!(
                    "kline row has {} fields",
                    row.len()
                )));
            }
            let open_time = row[0]
                .as_i64()
                .ok_or_else(|| ProviderError::Malformed("kline open time".to_string()))?;
            let timestamp = Utc
                .timestamp_millis_opt(open_time)
                .single()
                .ok_or_else(|| ProviderError::Malformed(format!("kline time {open_time}")))?;
            let candle = Candle {
                timestamp,
                open: number(&row[1])?,
                high: number(&row[2])?,
                low: number(&row[3])?,
                close: number(&row[4])?,
                volume: number(&row[5])?,
            };
            if candle.is_finite() {
                candles.push(candle);
            }
        }
        Ok(CandleSeries::new(candles)?)
    }
}

/// Binance encodes prices as strings; accept plain numbers too
fn number(value: &Value) -> Result<f64, ProviderError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| ProviderError::Malformed(format!("not a number: {s}"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProviderError::Malformed(format!("not a number: {n}"))),
        other => Err(ProviderError::Malformed(format!("not a number: {other}"))),
    }
}

#[async_trait]
impl CandleProvider for BinanceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Binance
    }

    async fn fetch(&self, code: &str, timeframe: Timeframe) -> Result<CandleSeries, ProviderError> {
        let known = self.known_symbols().await;
        let Some(symbol) = Self::resolve_symbol(code, known) else {
            tracing::debug!(code, "Symbol not listed on Binance");
            return Ok(CandleSeries::empty());
        };

        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = self.limit.to_string();
        tracing::debug!(symbol = %symbol, timeframe = %timeframe, "Fetching Binance klines");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.as_str()),
                ("interval", Self::interval(timeframe)),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(symbol = %symbol, %status, body = %body, "Binance rejected klines request");
            return Ok(CandleSeries::empty());
        }

        let body = response.text().await?;
        Self::parse_klines(&body)
    }
}
