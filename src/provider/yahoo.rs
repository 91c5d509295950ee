//! Yahoo Finance chart API provider
//!
//! Used for BIST equities (`AKBNK.IS`). Yahoo has no 4h interval, so 4h
//! series are built from hourly bars.

use super::{CandleProvider, ProviderError, ProviderKind};
use crate::candle::{resample_ohlcv, Candle, CandleSeries, Timeframe};
use crate::config::ProvidersConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// History window requested for every interval
const HISTORY_RANGE: &str = "730d";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) divscan/0.1";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Yahoo Finance daily/hourly/weekly bars
pub struct YahooProvider {
    base_url: String,
    limit: usize,
    client: Client,
}

impl YahooProvider {
    pub fn new(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
            limit: config.candle_limit,
            client,
        })
    }

    /// Yahoo interval to request for a timeframe
    fn interval(timeframe: Timeframe) -> &'static str {
        match timeframe {
            Timeframe::OneHour => "60m",
            // Fetched hourly, resampled after the fetch
            Timeframe::FourHours => "1h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1wk",
        }
    }

    /// Parse a chart payload, dropping rows with missing prices.
    ///
    /// Duplicate timestamps keep the last row and the result is sorted.
    fn parse_chart(body: &str) -> Result<CandleSeries, ProviderError> {
        let response: ChartResponse = serde_json::from_str(body)?;
        if let Some(error) = response.chart.error {
            tracing::debug!(code = %error.code, description = %error.description, "Yahoo chart error");
            return Ok(CandleSeries::empty());
        }
        let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(CandleSeries::empty());
        };
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        let mut rows: BTreeMap<i64, Candle> = BTreeMap::new();
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let (Some(open), Some(high), Some(low), Some(close)) = (
                cell(&quote.open, i),
                cell(&quote.high, i),
                cell(&quote.low, i),
                cell(&quote.close, i),
            ) else {
                continue;
            };
            let Some(timestamp) = DateTime::<Utc>::from_timestamp(ts, 0) else {
                return Err(ProviderError::Malformed(format!("chart timestamp {ts}")));
            };
            let candle = Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: cell(&quote.volume, i).unwrap_or(0.0),
            };
            if candle.is_finite() {
                rows.insert(ts, candle);
            }
        }

        Ok(CandleSeries::new(rows.into_values().collect())?)
    }
}

fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

#[async_trait]
impl CandleProvider for YahooProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Yahoo
    }

    async fn fetch(&self, code: &str, timeframe: Timeframe) -> Result<CandleSeries, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, code.trim());
        tracing::debug!(code, timeframe = %timeframe, "Fetching Yahoo chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("interval", Self::interval(timeframe)),
                ("range", HISTORY_RANGE),
                ("includePrePost", "false"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::debug!(code, %status, "Yahoo rejected chart request");
            return Ok(CandleSeries::empty());
        }

        let body = response.text().await?;
        let series = Self::parse_chart(&body)?.tail(self.limit);
        if timeframe == Timeframe::FourHours {
            return Ok(resample_ohlcv(&series, timeframe.duration()));
        }
        Ok(series)
    }
}
