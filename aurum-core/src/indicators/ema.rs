//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * close[t] + (1 - k) * EMA[t-1], k = 2 / (period + 1).
//! Seed: EMA[period-1] = SMA of the first `period` closes.
//! Lookback: period - 1.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.period)
    }
}

/// EMA over an arbitrary numeric series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let ema = k * values[i] + (1.0 - k) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}
