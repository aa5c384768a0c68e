//! Yahoo Finance data provider.
//!
//! Fetches intraday OHLCV bars from Yahoo's v8 chart API using the
//! timeframe's candle interval and range. Retries with exponential backoff and
//! reports throttling to the shared circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; the fallback chain covers for it when it misbehaves.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{tidy_bars, DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Bar, Timeframe};
use chrono::DateTime;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, timeframe: Timeframe) -> String {
        format!(
            "{BASE_URL}/{symbol}?range={}&interval={}&includePrePost=false",
            timeframe.as_str(),
            timeframe.interval_label()
        )
    }

    /// Parse a chart API body into bars, skipping slots with missing prices.
    fn parse_response(symbol: &str, body: &str) -> Result<Vec<Bar>, DataError> {
        let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;
        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let at = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten();
        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
            })?;
            let (Some(open), Some(high), Some(low), Some(close)) = (
                at(&quote.open, i),
                at(&quote.high, i),
                at(&quote.low, i),
                at(&quote.close, i),
            ) else {
                continue;
            };
            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        let bars = tidy_bars(bars);
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }

    fn fetch_with_retry(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        let url = Self::chart_url(symbol, timeframe);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(attempt, ?delay, "retrying yahoo request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let bars = Self::parse_response(symbol, &body)?;
            self.circuit_breaker.record_success();
            return Ok(bars);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        tracing::info!(symbol, %timeframe, "fetching from Yahoo Finance");
        let bars = self.fetch_with_retry(symbol, timeframe)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
