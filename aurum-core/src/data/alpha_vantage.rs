//! Alpha Vantage data provider (`TIME_SERIES_INTRADAY`).
//!
//! Requires an API key. The free tier allows five requests per minute, so
//! requests from one provider instance are spaced at least `min_interval`
//! apart. Rate-limit notices arrive as HTTP 200 bodies with a "Note" or
//! "Information" field instead of a time series.

use super::provider::{tidy_bars, trim_to_span, DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Bar, Timeframe};
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Zone assumed when the response metadata does not name one.
const DEFAULT_ZONE: Tz = chrono_tz::America::New_York;

pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    api_key: Option<String>,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

fn av_interval(timeframe: Timeframe) -> String {
    format!("{}min", timeframe.interval_minutes())
}

fn field(candle: &Value, key: &str) -> Result<f64, DataError> {
    candle
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("missing or invalid '{key}'")))
}

/// Intraday timestamps are exchange-local; the zone is named in the metadata.
fn exchange_zone(data: &Value) -> Result<Tz, DataError> {
    let name = data
        .get("Meta Data")
        .and_then(|meta| meta.get("6. Time Zone"))
        .and_then(Value::as_str);
    match name {
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map_err(|_| DataError::ResponseFormatChanged(format!("unknown time zone '{name}'"))),
        None => Ok(DEFAULT_ZONE),
    }
}

impl AlphaVantageProvider {
    pub fn new(api_key: Option<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            min_interval: Duration::from_secs(12),
            last_request: Mutex::new(None),
        })
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    fn wait_for_slot(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(at) = *last {
            let elapsed = at.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::info!(wait_secs = wait.as_secs_f64(), "alpha vantage rate limiting");
                std::thread::sleep(wait);
            }
        }
        *last = Some(Instant::now());
    }

    /// Parse an intraday response body into ascending bars.
    fn parse_response(symbol: &str, timeframe: Timeframe, body: &str) -> Result<Vec<Bar>, DataError> {
        let data: Value = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        if let Some(msg) = data.get("Error Message").and_then(Value::as_str) {
            return Err(if msg.contains("Invalid API call") {
                DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }
            } else {
                DataError::Other(msg.to_string())
            });
        }
        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(DataError::RateLimited {
                retry_after_secs: 60,
            });
        }

        let key = format!("Time Series ({})", av_interval(timeframe));
        let series = data
            .get(&key)
            .and_then(Value::as_object)
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("no '{key}' in response")))?;

        let zone = exchange_zone(&data)?;

        let mut bars = Vec::with_capacity(series.len());
        for (stamp, candle) in series {
            let local = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").map_err(|e| {
                DataError::ResponseFormatChanged(format!("invalid timestamp '{stamp}': {e}"))
            })?;
            // The repeated hour when DST ends resolves to its first occurrence.
            let timestamp = zone
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!(
                        "timestamp '{stamp}' does not exist in {zone}"
                    ))
                })?;
            bars.push(Bar {
                timestamp,
                open: field(candle, "1. open")?,
                high: field(candle, "2. high")?,
                low: field(candle, "3. low")?,
                close: field(candle, "4. close")?,
                volume: field(candle, "5. volume")? as u64,
            });
        }

        let bars = trim_to_span(tidy_bars(bars), timeframe);
        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

impl DataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DataError::AuthenticationRequired("ALPHA_VANTAGE_API_KEY is not set".into())
        })?;

        self.wait_for_slot();
        tracing::info!(symbol, %timeframe, "fetching from Alpha Vantage");

        let interval = av_interval(timeframe);
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol),
                ("interval", interval.as_str()),
                ("outputsize", "full"),
                ("apikey", api_key),
            ])
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited {
                retry_after_secs: 60,
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }
        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars: Self::parse_response(symbol, timeframe, &body)?,
            source: DataSource::AlphaVantage,
        })
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}
