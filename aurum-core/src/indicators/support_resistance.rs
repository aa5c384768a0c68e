//! Support and resistance from pivot highs and lows.
//!
//! A bar is a pivot high when its high is >= every high within `radius` bars
//! on both sides; pivot lows mirror this on lows. Only bars inside the last
//! `lookback` bars are candidates, and a candidate needs `radius` bars after it,
//! so the newest `radius` bars never qualify.

use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    /// Highest pivot low strictly below the close.
    pub support: Option<f64>,
    /// Lowest pivot high strictly above the close.
    pub resistance: Option<f64>,
    /// Classic pivot point (H + L + C) / 3 of the lookback window.
    pub pivot: f64,
    pub close: f64,
}

impl Levels {
    /// Where the close sits between support (0.0) and resistance (1.0).
    pub fn position(&self) -> Option<f64> {
        match (self.support, self.resistance) {
            (Some(s), Some(r)) if r > s => Some(((self.close - s) / (r - s)).clamp(0.0, 1.0)),
            _ => None,
        }
    }
}

/// Indices of pivot highs and pivot lows in `bars[start..]`.
pub fn pivots(bars: &[Bar], start: usize, radius: usize) -> (Vec<usize>, Vec<usize>) {
    let n = bars.len();
    let mut highs = Vec::new();
    let mut lows = Vec::new();
    if n <= radius.saturating_mul(2) {
        return (highs, lows);
    }

    for i in start.max(radius)..n - radius {
        let neighbours = || (i - radius..=i + radius).filter(move |&j| j != i);
        if neighbours().all(|j| bars[i].high >= bars[j].high) {
            highs.push(i);
        }
        if neighbours().all(|j| bars[i].low <= bars[j].low) {
            lows.push(i);
        }
    }
    (highs, lows)
}

/// Nearest support below and resistance above the latest close.
///
/// Returns `None` when fewer than `2 * radius + 1` bars are available.
pub fn find_levels(bars: &[Bar], lookback: usize, radius: usize) -> Option<Levels> {
    let n = bars.len();
    if lookback == 0 || n <= radius.saturating_mul(2) {
        return None;
    }
    let start = n.saturating_sub(lookback);
    let close = bars[n - 1].close;

    let (high_idx, low_idx) = pivots(bars, start, radius);

    let support = low_idx
        .iter()
        .map(|&i| bars[i].low)
        .filter(|&low| low < close)
        .fold(None, |best: Option<f64>, low| Some(best.map_or(low, |b| b.max(low))));
    let resistance = high_idx
        .iter()
        .map(|&i| bars[i].high)
        .filter(|&high| high > close)
        .fold(None, |best: Option<f64>, high| Some(best.map_or(high, |b| b.min(high))));

    let window = &bars[start..];
    let window_high = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let window_low = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let pivot = (window_high + window_low + close) / 3.0;

    Some(Levels {
        support,
        resistance,
        pivot,
        close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn flat_series_brackets_close() {
        let levels = find_levels(&make_bars(&[100.0; 30]), 50, 2).unwrap();
        assert_eq!(levels.support, Some(99.0));
        assert_eq!(levels.resistance, Some(101.0));
        assert_approx(levels.position().unwrap(), 0.5, DEFAULT_EPSILON);
        assert_approx(levels.pivot, 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn huge_radius_is_insufficient() {
        let bars = make_bars(&[100.0; 30]);
        assert!(find_levels(&bars, 50, usize::MAX / 2 + 1).is_none());
        assert_eq!(pivots(&bars, 0, usize::MAX), (vec![], vec![]));
        assert!(find_levels(&make_bars(&[100.0; 5]), 50, 2).is_some());
    }

    #[test]
    fn steady_ramp_has_no_pivots() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let levels = find_levels(&make_bars(&closes), 50, 2).unwrap();
        assert_eq!(levels.support, None);
        assert_eq!(levels.resistance, None);
        assert_eq!(levels.position(), None);
    }

    #[test]
    fn picks_nearest_levels() {
        // peak at 110 (idx 3), trough at 95 (idx 8), smaller peak at 106 (idx 12)
        let closes = [
            100.0, 104.0, 108.0, 110.0, 107.0, 103.0, 99.0, 97.0, 95.0, 98.0, 101.0, 104.0,
            106.0, 104.0, 102.0, 101.0, 102.0,
        ];
        let levels = find_levels(&make_bars(&closes), 50, 2).unwrap();
        let close = 102.0;
        let r = levels.resistance.unwrap();
        let s = levels.support.unwrap();
        assert!(r > close && s < close);
        // the 106 peak is nearer than the 110 one
        assert!(r < 110.0);
    }

    #[test]
    fn newest_bars_are_not_pivots() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 110.0]);
        let (highs, _) = pivots(&bars, 0, 2);
        assert!(!highs.contains(&4));
    }

    #[test]
    fn too_short_for_a_neighbourhood() {
        assert!(find_levels(&make_bars(&[100.0; 4]), 50, 2).is_none());
    }
}
