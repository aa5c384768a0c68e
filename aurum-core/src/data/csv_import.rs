//! CSV file provider.
//!
//! One file per symbol and timeframe, `{dir}/{symbol}_{timeframe}.csv`, with a
//! `timestamp,open,high,low,close,volume` header. Timestamps are RFC 3339 or
//! `YYYY-MM-DD HH:MM:SS` (read as UTC).

use super::provider::{tidy_bars, DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Bar, Timeframe};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.dir.join(format!("{symbol}_{timeframe}.csv"))
    }

    fn csv_error(path: &Path, message: impl ToString) -> DataError {
        DataError::Csv {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Read every row of a bar file.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| Self::csv_error(path, e))?;
        let mut bars = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| Self::csv_error(path, e))?;
            let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| {
                Self::csv_error(
                    path,
                    format!("row {}: invalid timestamp '{}'", line + 1, row.timestamp),
                )
            })?;
            bars.push(Bar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }
        Ok(bars)
    }

    /// Write bars in the same layout `read_bars` accepts.
    pub fn write_bars(path: &Path, bars: &[Bar]) -> Result<(), DataError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| Self::csv_error(path, e))?;
        for bar in bars {
            writer
                .serialize(CsvRow {
                    timestamp: bar.timestamp.to_rfc3339(),
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                })
                .map_err(|e| Self::csv_error(path, e))?;
        }
        writer.flush().map_err(|e| Self::csv_error(path, e))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let path = self.path_for(symbol, timeframe);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        tracing::info!(path = %path.display(), "reading bars from CSV");
        let bars = tidy_bars(Self::read_bars(&path)?);
        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars,
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_timestamp_forms() {
        let a = parse_timestamp("2024-03-04T14:30:00Z").unwrap();
        let b = parse_timestamp("2024-03-04 14:30:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("04/03/2024").is_none());
    }

    #[test]
    fn path_layout() {
        let provider = CsvProvider::new("/data");
        assert_eq!(
            provider.path_for("GLD", Timeframe::FiveDays),
            PathBuf::from("/data/GLD_5d.csv")
        );
    }
}
