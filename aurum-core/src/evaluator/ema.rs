//! EMA crossover classification.
//!
//! A crossover within the last `cross_lookback` bars that still holds gives a
//! full-strength call. Without one, a persistent gap of at least
//! `trend_min_gap_pct` keeps the trend direction at reduced strength.

use super::{IndicatorKind, IndicatorReading, ReadingValues};
use crate::config::EmaConfig;
use crate::domain::{Bar, Signal};
use crate::indicators::{Ema, Indicator};

/// Strength of a gap relative to price, before any trend reduction.
pub fn gap_strength(gap: f64, price: f64, scale: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    super::clamp_strength(gap.abs() / price * scale)
}

/// Most recent crossover in the last `lookback` bars: direction and bar index.
fn recent_cross(short: &[f64], long: &[f64], lookback: usize) -> Option<(Signal, usize)> {
    let n = short.len();
    let earliest = n.saturating_sub(lookback).max(1);
    (earliest..n).rev().find_map(|j| {
        let (sc, lc, sp, lp) = (short[j], long[j], short[j - 1], long[j - 1]);
        if [sc, lc, sp, lp].iter().any(|v| v.is_nan()) {
            None
        } else if sc > lc && sp <= lp {
            Some((Signal::Buy, j))
        } else if sc < lc && sp >= lp {
            Some((Signal::Sell, j))
        } else {
            None
        }
    })
}

pub fn evaluate(bars: &[Bar], config: &EmaConfig) -> IndicatorReading {
    let name = format!("ema_{}_{}", config.short_period, config.long_period);
    let required = config.long_period.saturating_add(1);
    let n = bars.len();
    if n < required {
        return IndicatorReading::insufficient(IndicatorKind::Ema, name, required, n);
    }

    let short = Ema::new(config.short_period).compute(bars);
    let long = Ema::new(config.long_period).compute(bars);
    let (s, l) = (short[n - 1], long[n - 1]);
    let (ps, pl) = (short[n - 2], long[n - 2]);
    let close = bars[n - 1].close;

    let gap = s - l;
    let gap_pct = if close > 0.0 { gap / close * 100.0 } else { 0.0 };
    let full = gap_strength(gap, close, config.gap_scale);

    let current_side = Signal::from_sign(gap);
    let cross = recent_cross(&short, &long, config.cross_lookback)
        .filter(|&(direction, _)| direction == current_side);

    let (signal, strength, rationale) = match cross {
        Some((direction, at)) => {
            let ago = n - 1 - at;
            let verb = if direction == Signal::Buy { "above" } else { "below" };
            (
                direction,
                full,
                format!(
                    "EMA{} crossed {verb} EMA{} {ago} bar(s) ago, gap {gap_pct:+.2}%",
                    config.short_period, config.long_period
                ),
            )
        }
        None => {
            let reduced = full * config.trend_strength_factor;
            if gap_pct.abs() >= config.trend_min_gap_pct && current_side.is_directional() {
                let trend = if current_side == Signal::Buy { "uptrend" } else { "downtrend" };
                (
                    current_side,
                    reduced,
                    format!("{trend} continuation, EMA gap {gap_pct:+.2}%"),
                )
            } else {
                (
                    Signal::Hold,
                    reduced,
                    format!("no crossover, EMA gap {gap_pct:+.2}% too narrow"),
                )
            }
        }
    };

    IndicatorReading::new(
        IndicatorKind::Ema,
        name,
        signal,
        strength,
        ReadingValues::Ema {
            short: s,
            long: l,
            previous_short: ps,
            previous_long: pl,
            gap,
            gap_pct,
            crossover: cross.is_some(),
            bars_since_cross: cross.map(|(_, at)| n - 1 - at),
        },
        rationale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    fn ramp(n: usize, step: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + step * i as f64).collect();
        make_bars(&closes)
    }

    #[test]
    fn insufficient_below_long_plus_one() {
        let reading = evaluate(&ramp(21, 1.0), &EmaConfig::default());
        assert!(reading.is_insufficient());
        assert_eq!(reading.signal, Signal::Hold);
        assert_eq!(reading.strength, 0.0);
    }

    #[test]
    fn steady_uptrend_is_trend_buy() {
        let reading = evaluate(&ramp(25, 1.0), &EmaConfig::default());
        assert_eq!(reading.signal, Signal::Buy);
        // gap 6 on 124 → 9.677 full, halved
        assert_approx(reading.strength, 6.0 / 124.0 * 200.0 * 0.5, 1e-9);
        match reading.values {
            ReadingValues::Ema { crossover, gap, .. } => {
                assert!(!crossover);
                assert_approx(gap, 6.0, 1e-9);
            }
            ref other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn steady_downtrend_is_trend_sell() {
        let reading = evaluate(&ramp(25, -1.0), &EmaConfig::default());
        assert_eq!(reading.signal, Signal::Sell);
    }

    #[test]
    fn flat_series_holds() {
        let reading = evaluate(&make_bars(&[100.0; 30]), &EmaConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert_eq!(reading.strength, 0.0);
    }

    #[test]
    fn fresh_cross_up_is_full_strength() {
        // long decline then a sharp rally on the final bars
        let mut closes: Vec<f64> = (0..30).map(|i| 130.0 - i as f64).collect();
        closes.extend([115.0, 125.0, 135.0]);
        let bars = make_bars(&closes);
        let config = EmaConfig::default();

        let short = Ema::new(9).compute(&bars);
        let long = Ema::new(21).compute(&bars);
        let n = bars.len();
        assert!(short[n - 1] > long[n - 1]);
        assert!(recent_cross(&short, &long, 3).is_some());

        let reading = evaluate(&bars, &config);
        assert_eq!(reading.signal, Signal::Buy);
        let close = bars[n - 1].close;
        assert_approx(
            reading.strength,
            gap_strength(short[n - 1] - long[n - 1], close, 200.0),
            1e-9,
        );
        assert!(matches!(
            reading.values,
            ReadingValues::Ema { crossover: true, .. }
        ));
    }

    #[test]
    fn gap_strength_is_monotone() {
        let mut last = 0.0;
        for i in 0..100 {
            let s = gap_strength(i as f64 * 0.05, 100.0, 200.0);
            assert!(s >= last);
            last = s;
        }
        assert_eq!(last, 10.0);
    }
}
