//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (needs period + 1 closes).
//! Edge cases: no movement at all → 50; avg_loss == 0 → 100; avg_gain == 0 → 0.

use super::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rsi_of_series(&closes(bars), self.period)
    }
}

/// RSI over a close series.
pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n <= period {
        return result;
    }

    let split = |change: f64| (change.max(0.0), (-change).max(0.0));

    let (mut avg_gain, mut avg_loss) = values[..=period]
        .windows(2)
        .map(|w| split(w[1] - w[0]))
        .fold((0.0, 0.0), |(g, l), (gain, loss)| (g + gain, l + loss));
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = rsi_from_averages(avg_gain, avg_loss);

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let (gain, loss) = split(values[i] - values[i - 1]);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
