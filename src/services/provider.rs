//! Yahoo Finance API Client
//!
//! Fetches OHLC price history from the public chart endpoint
//! (https://query1.finance.yahoo.com/v8/finance/chart) and display names from
//! the quote endpoint. One chart request per symbol; the batch entry point
//! iterates a batch and merges per-symbol series into the normalized
//! ticker -> series shape consumed downstream.
//!
//! Timestamps arrive as UTC epochs together with the exchange timezone name
//! in the chart meta. They are converted to exchange-local clock time and the
//! zone annotation is stripped, so hourly bars and daily bars join cleanly by
//! calendar date.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Interval, MarketData, PriceBar, TimeSeries};
use crate::services::fetcher::HistorySource;
use crate::services::names::NameSource;
use crate::utils::api_base_url;

/// Request timeout for provider calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Browser User-Agent; the chart endpoint rejects the default client UA
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No data available for {0}")]
    NoData(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

/// Parallel OHLCV arrays; the provider pads gaps with nulls
#[derive(Debug, Deserialize)]
struct QuoteBlock {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    result: Option<Vec<QuoteResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    symbol: String,
    long_name: Option<String>,
    short_name: Option<String>,
}

pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(api_base_url())
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch price history for a single symbol
    pub async fn history(
        &self,
        symbol: &str,
        lookback_days: u32,
        interval: Interval,
    ) -> Result<TimeSeries, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let range = format!("{}d", lookback_days);

        debug!(symbol, %range, interval = interval.label(), "requesting chart data");

        let response = self
            .client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", interval.to_provider_format())])
            .send()
            .await?;

        // Unknown symbols come back as 404 with an error envelope
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NoData(symbol.to_string()));
        }
        if !response.status().is_success() {
            return Err(ProviderError::InvalidResponse(format!(
                "chart request for {} returned HTTP {}",
                symbol,
                response.status()
            )));
        }

        let payload: ChartResponse = response.json().await?;

        if let Some(error) = payload.chart.error {
            debug!(symbol, code = %error.code, "provider error for symbol");
            return Err(ProviderError::NoData(format!(
                "{} ({})",
                symbol,
                error.description.unwrap_or(error.code)
            )));
        }

        let result = payload
            .chart
            .result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        parse_chart_result(symbol, result)
    }

    /// Fetch the display name for a single symbol
    pub async fn quote_name(&self, symbol: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v7/finance/quote", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("symbols", symbol)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::InvalidResponse(format!(
                "quote request for {} returned HTTP {}",
                symbol,
                response.status()
            )));
        }

        let payload: QuoteResponse = response.json().await?;
        let quote = payload
            .quote_response
            .result
            .unwrap_or_default()
            .into_iter()
            .find(|q| q.symbol == symbol)
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

        quote
            .long_name
            .or(quote.short_name)
            .ok_or_else(|| ProviderError::NoData(symbol.to_string()))
    }
}

impl HistorySource for YahooFinanceClient {
    /// Fetch one batch of symbols sequentially and merge into MarketData
    ///
    /// Symbols with no data are absent from the result. A transport-level
    /// failure aborts the batch (the caller decides whether other batches
    /// continue).
    async fn fetch(
        &self,
        symbols: &[String],
        lookback_days: u32,
        interval: Interval,
    ) -> Result<MarketData, ProviderError> {
        let mut data = MarketData::new();

        for symbol in symbols {
            match self.history(symbol, lookback_days, interval).await {
                Ok(bars) if !bars.is_empty() => {
                    data.insert(symbol.clone(), bars);
                }
                Ok(_) => {
                    debug!(symbol, "empty series from provider");
                }
                Err(ProviderError::NoData(reason)) => {
                    debug!(symbol, %reason, "no data from provider");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(data)
    }
}

impl NameSource for YahooFinanceClient {
    async fn display_name(&self, symbol: &str) -> Result<String, ProviderError> {
        self.quote_name(symbol).await
    }
}

fn parse_chart_result(symbol: &str, result: ChartResult) -> Result<TimeSeries, ProviderError> {
    let timestamps = result
        .timestamp
        .ok_or_else(|| ProviderError::NoData(symbol.to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing quote block for {}", symbol)))?;

    let opens = quote
        .open
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing opens for {}", symbol)))?;
    let highs = quote
        .high
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing highs for {}", symbol)))?;
    let lows = quote
        .low
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing lows for {}", symbol)))?;
    let closes = quote
        .close
        .ok_or_else(|| ProviderError::InvalidResponse(format!("missing closes for {}", symbol)))?;
    let volumes = quote.volume.unwrap_or_default();

    let length = timestamps.len();
    if [opens.len(), highs.len(), lows.len(), closes.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(ProviderError::InvalidResponse(format!(
            "inconsistent array lengths for {}",
            symbol
        )));
    }

    let tz = parse_exchange_timezone(symbol, result.meta.exchange_timezone_name.as_deref());

    let mut bars = Vec::with_capacity(length);
    for i in 0..length {
        // Gap rows are null-padded; a bar needs the full OHLC
        let (open, high, low, close) = match (opens[i], highs[i], lows[i], closes[i]) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = volumes.get(i).copied().flatten().unwrap_or(0);

        let Some(time) = local_naive_time(timestamps[i], tz) else {
            return Err(ProviderError::InvalidResponse(format!(
                "invalid timestamp {} for {}",
                timestamps[i], symbol
            )));
        };

        bars.push(PriceBar::new(time, open, high, low, close, volume));
    }

    bars.sort_by_key(|bar| bar.time);
    Ok(bars)
}

fn parse_exchange_timezone(symbol: &str, name: Option<&str>) -> Option<Tz> {
    let name = name?;
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(symbol, timezone = name, "unparseable exchange timezone, falling back to UTC");
            None
        }
    }
}

/// Convert a UTC epoch to naive exchange-local time (zone stripped)
fn local_naive_time(timestamp: i64, tz: Option<Tz>) -> Option<NaiveDateTime> {
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    Some(match tz {
        Some(tz) => utc.with_timezone(&tz).naive_local(),
        None => utc.naive_utc(),
    })
}
