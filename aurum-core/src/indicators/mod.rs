//! Indicator library.
//!
//! Every indicator is a pure function of the bar history. Series outputs have
//! the same length as the input, with `NaN` in warm-up slots; a series that is
//! entirely `NaN` means the history was too short ("insufficient data").
//! No value at bar t may depend on bars after t.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod support_resistance;
pub mod volume;

pub use atr::Atr;
pub use ema::Ema;
pub use rsi::Rsi;
pub use support_resistance::{find_levels, Levels};
pub use volume::{volume_ratio, VolumeRatio, VolumeStatus};

use crate::domain::Bar;

/// Single-series indicator over a bar history.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_9", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading `NaN` slots before the first valid value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// Minimum number of bars needed for one valid value.
    fn required_bars(&self) -> usize {
        self.lookback().saturating_add(1)
    }
}

/// Last value of a series if it is not a warm-up slot.
pub fn latest_valid(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| !v.is_nan())
}

/// Second-to-last value of a series if it is not a warm-up slot.
pub fn previous_valid(series: &[f64]) -> Option<f64> {
    series
        .len()
        .checked_sub(2)
        .and_then(|i| series.get(i))
        .copied()
        .filter(|v| !v.is_nan())
}

pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Create synthetic 5-minute bars from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::{TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::minutes(5 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
