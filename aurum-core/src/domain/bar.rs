//! Bar: one OHLCV candle, and the input contract for a bar series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV candle for a single instrument over one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Why a bar series was rejected.
///
/// Indices refer to positions in the slice handed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("bar series is empty")]
    Empty,

    #[error("timestamp at bar {index} is not after the previous bar")]
    NonMonotonicTimestamp { index: usize },

    #[error("bar {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("bar {index}: {field} is negative")]
    Negative { index: usize, field: &'static str },

    #[error("bar {index}: high/low do not bracket open and close")]
    InconsistentRange { index: usize },
}

impl Bar {
    fn prices(&self) -> [(&'static str, f64); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }

    /// Check a single bar against the input contract.
    pub fn check(&self, index: usize) -> Result<(), InputError> {
        for (field, value) in self.prices() {
            if !value.is_finite() {
                return Err(InputError::NonFinite { index, field });
            }
            if value < 0.0 {
                return Err(InputError::Negative { index, field });
            }
        }
        let sane = self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close;
        if !sane {
            return Err(InputError::InconsistentRange { index });
        }
        Ok(())
    }

    /// Returns true if the bar satisfies the per-bar input contract.
    pub fn is_sane(&self) -> bool {
        self.check(0).is_ok()
    }
}

/// Validate a whole series: non-empty, strictly increasing timestamps, sane bars.
///
/// Fails on the first violation found, scanning oldest to newest.
pub fn validate_series(bars: &[Bar]) -> Result<(), InputError> {
    if bars.is_empty() {
        return Err(InputError::Empty);
    }
    for (index, bar) in bars.iter().enumerate() {
        bar.check(index)?;
        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(InputError::NonMonotonicTimestamp { index });
        }
    }
    Ok(())
}
