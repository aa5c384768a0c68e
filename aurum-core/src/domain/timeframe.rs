//! Analysis timeframes: how much history to look at and at which candle size.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// One trading day of 5-minute candles.
    #[serde(rename = "1d")]
    OneDay,
    /// Two trading days of 15-minute candles.
    #[serde(rename = "2d")]
    TwoDays,
    /// Five trading days of 30-minute candles.
    #[serde(rename = "5d")]
    FiveDays,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::OneDay, Timeframe::TwoDays, Timeframe::FiveDays];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::TwoDays => "2d",
            Timeframe::FiveDays => "5d",
        }
    }

    pub fn interval_minutes(self) -> i64 {
        match self {
            Timeframe::OneDay => 5,
            Timeframe::TwoDays => 15,
            Timeframe::FiveDays => 30,
        }
    }

    pub fn interval(self) -> Duration {
        Duration::minutes(self.interval_minutes())
    }

    /// Calendar span covered by the timeframe.
    pub fn span(self) -> Duration {
        match self {
            Timeframe::OneDay => Duration::days(1),
            Timeframe::TwoDays => Duration::days(2),
            Timeframe::FiveDays => Duration::days(5),
        }
    }

    /// Interval label understood by the Yahoo and Alpha Vantage APIs.
    pub fn interval_label(self) -> &'static str {
        match self {
            Timeframe::OneDay => "5m",
            Timeframe::TwoDays => "15m",
            Timeframe::FiveDays => "30m",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Timeframe::OneDay),
            "2d" => Ok(Timeframe::TwoDays),
            "5d" => Ok(Timeframe::FiveDays),
            other => Err(format!("unknown timeframe '{other}' (expected 1d, 2d or 5d)")),
        }
    }
}
