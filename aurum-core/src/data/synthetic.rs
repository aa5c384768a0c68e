//! Synthetic demo bars.
//!
//! Close = base + trend + noise + cycle, with OHLC built around each close.
//! Seeded from (symbol, timeframe, scenario) via BLAKE3, so a given request
//! always yields the same series. Timestamps end at an explicit anchor rather
//! than the wall clock. These are clearly fake and tagged as synthetic.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Bar, Timeframe};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Mild uptrend with a cyclical swing.
    Demo,
    Bullish,
    Bearish,
    Sideways,
}

impl Scenario {
    fn as_str(self) -> &'static str {
        match self {
            Scenario::Demo => "demo",
            Scenario::Bullish => "bullish",
            Scenario::Bearish => "bearish",
            Scenario::Sideways => "sideways",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(Scenario::Demo),
            "bullish" => Ok(Scenario::Bullish),
            "bearish" => Ok(Scenario::Bearish),
            "sideways" => Ok(Scenario::Sideways),
            other => Err(format!("unknown scenario '{other}'")),
        }
    }
}

pub struct SyntheticProvider {
    scenario: Scenario,
    end: DateTime<Utc>,
    base_price: f64,
    num_bars: usize,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Evenly spaced point `i` of `n` between 0 and `to`.
fn linspace(i: usize, n: usize, to: f64) -> f64 {
    if n <= 1 {
        0.0
    } else {
        to * i as f64 / (n - 1) as f64
    }
}

impl SyntheticProvider {
    pub fn new(scenario: Scenario, end: DateTime<Utc>) -> Self {
        Self {
            scenario,
            end,
            base_price: 200.0,
            num_bars: 100,
        }
    }

    pub fn with_bars(mut self, num_bars: usize) -> Self {
        self.num_bars = num_bars;
        self
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    fn seed(&self, symbol: &str, timeframe: Timeframe) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(timeframe.as_str().as_bytes());
        hasher.update(self.scenario.as_str().as_bytes());
        *hasher.finalize().as_bytes()
    }

    fn closes(&self, rng: &mut StdRng) -> Vec<f64> {
        let n = self.num_bars;
        (0..n)
            .map(|i| {
                let (trend, noise) = match self.scenario {
                    Scenario::Demo => (linspace(i, n, 5.0), rng.gen_range(-3.5..3.5)),
                    Scenario::Bullish => (linspace(i, n, 15.0), rng.gen_range(-1.7..1.7)),
                    Scenario::Bearish => (linspace(i, n, -15.0), rng.gen_range(-1.7..1.7)),
                    Scenario::Sideways => (rng.gen_range(-0.9..0.9), rng.gen_range(-3.5..3.5)),
                };
                let cycle = match self.scenario {
                    Scenario::Demo | Scenario::Sideways => 3.0 * linspace(i, n, 4.0 * PI).sin(),
                    Scenario::Bullish | Scenario::Bearish => 0.0,
                };
                self.base_price + trend + noise + cycle
            })
            .collect()
    }

    /// Generate the series for one symbol and timeframe.
    pub fn generate(&self, symbol: &str, timeframe: Timeframe) -> Vec<Bar> {
        let mut rng = StdRng::from_seed(self.seed(symbol, timeframe));
        let closes = self.closes(&mut rng);
        let n = closes.len();
        let interval = timeframe.interval();

        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let volatility: f64 = rng.gen_range(0.5..2.0);
                let open = match i {
                    0 => close + rng.gen_range(-0.5..0.5),
                    _ => closes[i - 1] + rng.gen_range(-0.3..0.3),
                };
                let high = (close + rng.gen_range(0.0..volatility)).max(open).max(close);
                let low = (close - rng.gen_range(0.0..volatility)).min(open).min(close);

                let prev = if i == 0 { close } else { closes[i - 1] };
                let move_boost = 1.0 + (close - prev).abs() / close * 10.0;
                let volume = (rng.gen_range(1_000_000.0..3_000_000.0) * move_boost) as u64;

                Bar {
                    timestamp: self.end - interval * (n - 1 - i) as i32,
                    open: round2(open),
                    high: round2(high),
                    low: round2(low),
                    close: round2(close),
                    volume,
                }
            })
            .collect()
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        tracing::warn!(
            symbol,
            %timeframe,
            scenario = %self.scenario,
            "using synthetic demo data"
        );
        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars: self.generate(symbol, timeframe),
            source: DataSource::Synthetic,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}
