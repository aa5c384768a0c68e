//! Data provider trait and structured error types.
//!
//! The `DataProvider` trait abstracts over price sources (Alpha Vantage, Yahoo
//! Finance, CSV files, synthetic demo data) so the engine only ever sees a bar
//! series, never the source that produced it.

use crate::domain::{Bar, InputError, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv error in {path}: {message}")]
    Csv { path: String, message: String },

    #[error("validation error: {0}")]
    Validation(#[from] InputError),

    #[error("insufficient data: {available} bars, at least {required} required")]
    InsufficientBars { required: usize, available: usize },

    #[error("all data sources failed: {}", summarize(.0))]
    AllSourcesFailed(Vec<(String, String)>),

    #[error("data error: {0}")]
    Other(String),
}

fn summarize(failures: &[(String, String)]) -> String {
    if failures.is_empty() {
        return "no provider available".to_string();
    }
    failures
        .iter()
        .map(|(source, reason)| format!("{source}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    AlphaVantage,
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataSource::AlphaVantage => "Alpha Vantage",
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::CsvImport => "CSV import",
            DataSource::Synthetic => "synthetic demo data",
        })
    }
}

/// Result of a successful fetch for one symbol and timeframe.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Ordered oldest to newest.
    pub bars: Vec<Bar>,
    pub source: DataSource,
}

/// Source of bar series for a symbol and timeframe.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the bars covering `timeframe` for `symbol`.
    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError>;

    /// Check if the provider is currently usable (configured, not blocked).
    fn is_available(&self) -> bool;
}

/// Sort by time, drop duplicate timestamps (keeping the last) and bars that
/// break the OHLC contract. Providers return what survives.
pub fn tidy_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.timestamp);
    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    let mut dropped = 0usize;
    for bar in bars {
        if !bar.is_sane() {
            dropped += 1;
            continue;
        }
        match out.last_mut() {
            Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
            _ => out.push(bar),
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, "dropped malformed bars");
    }
    out
}

/// Keep the bars inside the timeframe's span ending at the newest bar.
pub fn trim_to_span(bars: Vec<Bar>, timeframe: Timeframe) -> Vec<Bar> {
    let Some(newest) = bars.last().map(|b| b.timestamp) else {
        return bars;
    };
    let cutoff: DateTime<Utc> = newest - timeframe.span();
    bars.into_iter().filter(|b| b.timestamp > cutoff).collect()
}
