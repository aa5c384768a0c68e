//! Support/resistance proximity classification.
//!
//! position = (close - support) / (resistance - support). Within `near_zone`
//! of support the reading is BUY, within `near_zone` of resistance it is SELL,
//! and in between it is a HOLD whose strength peaks at the midpoint.

use super::{IndicatorKind, IndicatorReading, ReadingValues};
use crate::config::SupportResistanceConfig;
use crate::domain::{Bar, Signal};
use crate::indicators::find_levels;

fn fmt_level(level: Option<f64>) -> String {
    level.map_or_else(|| "none".to_string(), |v| format!("{v:.2}"))
}

pub fn evaluate(bars: &[Bar], config: &SupportResistanceConfig) -> IndicatorReading {
    let name = format!("pivots_{}", config.lookback);
    let Some(levels) = find_levels(bars, config.lookback, config.pivot_radius) else {
        return IndicatorReading::insufficient(
            IndicatorKind::SupportResistance,
            name,
            config.pivot_radius.saturating_mul(2).saturating_add(1),
            bars.len(),
        );
    };
    let position = levels.position();
    let values = ReadingValues::SupportResistance {
        support: levels.support,
        resistance: levels.resistance,
        pivot: levels.pivot,
        position,
    };

    let Some(p) = position else {
        return IndicatorReading::new(
            IndicatorKind::SupportResistance,
            name,
            Signal::Hold,
            0.0,
            values,
            format!(
                "no bracketing levels (support {}, resistance {})",
                fmt_level(levels.support),
                fmt_level(levels.resistance)
            ),
        );
    };

    let near = 1.0 - config.near_zone;
    let to_support = 1.0 - p;
    let to_resistance = p;
    let (signal, strength, rationale) = if to_support >= near {
        (
            Signal::Buy,
            10.0 * to_support,
            format!("price near support {}", fmt_level(levels.support)),
        )
    } else if to_resistance >= near {
        (
            Signal::Sell,
            10.0 * to_resistance,
            format!("price near resistance {}", fmt_level(levels.resistance)),
        )
    } else {
        (
            Signal::Hold,
            10.0 * (1.0 - (2.0 * p - 1.0).abs()),
            format!(
                "price between support {} and resistance {}",
                fmt_level(levels.support),
                fmt_level(levels.resistance)
            ),
        )
    };

    IndicatorReading::new(
        IndicatorKind::SupportResistance,
        name,
        signal,
        strength,
        values,
        rationale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    /// Oscillates between 95 and 105 so both pivot kinds exist, then ends at `last`.
    fn channel(last: f64) -> Vec<Bar> {
        let mut closes = Vec::new();
        for _ in 0..4 {
            closes.extend([100.0, 103.0, 105.0, 103.0, 100.0, 97.0, 95.0, 97.0]);
        }
        closes.extend([100.0, 100.0, last]);
        make_bars(&closes)
    }

    #[test]
    fn flat_series_is_midpoint_hold() {
        let reading = evaluate(&make_bars(&[100.0; 30]), &SupportResistanceConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert_approx(reading.strength, 10.0, 1e-9);
    }

    #[test]
    fn ramp_has_no_levels() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let reading = evaluate(&make_bars(&closes), &SupportResistanceConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert_eq!(reading.strength, 0.0);
        assert!(!reading.is_insufficient());
    }

    #[test]
    fn near_support_is_buy() {
        let reading = evaluate(&channel(94.8), &SupportResistanceConfig::default());
        assert_eq!(reading.signal, Signal::Buy);
        assert!(reading.strength >= 8.0);
    }

    #[test]
    fn near_resistance_is_sell() {
        let reading = evaluate(&channel(105.5), &SupportResistanceConfig::default());
        assert_eq!(reading.signal, Signal::Sell);
        assert!(reading.strength >= 8.0);
    }

    #[test]
    fn too_short_is_insufficient() {
        let reading = evaluate(&make_bars(&[100.0; 4]), &SupportResistanceConfig::default());
        assert!(reading.is_insufficient());
    }
}
