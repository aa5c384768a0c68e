//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR applies Wilder smoothing (alpha = 1/period) to TR[1..]; TR[0] has no
//! previous close and is left out of the seed.
//! Lookback: period.

use super::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// True Range series. TR[0] = high[0] - low[0].
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(pc) => hl.max((bar.high - pc).abs()).max((bar.low - pc).abs()),
                None => hl,
            }
        })
        .collect()
}

/// Wilder smoothing of `values[start..]`, seeded with the mean of the first
/// `period` values from `start`. Slots before the seed are `NaN`.
pub fn wilder_smooth(values: &[f64], start: usize, period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let seed_end = start + period;
    if period == 0 || n < seed_end {
        return result;
    }

    let seed = values[start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        wilder_smooth(&true_range(bars), 1, self.period)
    }
}
