//! Composite scorer: resolves the indicator readings into one call.
//!
//! EMA and RSI contribute weighted signed scores; volume scales the magnitude;
//! support/resistance nudges it up or down by at most `modifier_weight`.
//! Confidence counts how many directional readings agree with the verdict and
//! is independent of strength.

use crate::config::EngineConfig;
use crate::domain::Signal;
use crate::evaluator::{IndicatorKind, IndicatorReading, MAX_STRENGTH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSignal {
    pub signal: Signal,
    /// |score|, in [0, 10].
    pub strength: f64,
    /// Share of directional readings agreeing with `signal`, in [0, 10].
    pub confidence: f64,
    /// Final signed score after modifiers, in [-10, 10].
    pub score: f64,
    /// Weighted average before modifiers.
    pub raw_score: f64,
    pub contributing_readings: Vec<IndicatorReading>,
}

impl CompositeSignal {
    pub fn reading(&self, kind: IndicatorKind) -> Option<&IndicatorReading> {
        self.contributing_readings.iter().find(|r| r.kind == kind)
    }

    /// Readings that took a side (BUY or SELL).
    pub fn directional_count(&self) -> usize {
        self.contributing_readings
            .iter()
            .filter(|r| counts_for_confidence(r) && r.is_directional())
            .count()
    }
}

fn counts_for_confidence(reading: &IndicatorReading) -> bool {
    matches!(
        reading.kind,
        IndicatorKind::Ema | IndicatorKind::Rsi | IndicatorKind::SupportResistance
    )
}

/// Weighted average of signed EMA/RSI scores over readings with enough data.
fn weighted_score(readings: &[IndicatorReading], config: &EngineConfig) -> f64 {
    let weight_of = |kind| match kind {
        IndicatorKind::Ema => Some(config.composite.ema_weight),
        IndicatorKind::Rsi => Some(config.composite.rsi_weight),
        _ => None,
    };
    let (sum, total) = readings
        .iter()
        .filter(|r| !r.is_insufficient())
        .filter_map(|r| weight_of(r.kind).map(|w| (w * r.signed_score(), w)))
        .fold((0.0, 0.0), |(s, t), (ws, w)| (s + ws, t + w));
    if total > 0.0 {
        sum / total
    } else {
        0.0
    }
}

fn support_resistance_factor(reading: &IndicatorReading, score: f64, weight: f64) -> f64 {
    if reading.is_insufficient() || score == 0.0 {
        return 1.0;
    }
    let nudge = weight * reading.strength / MAX_STRENGTH;
    if reading.signal.is_directional() && reading.signal == Signal::from_sign(score) {
        1.0 + nudge
    } else {
        1.0 - nudge
    }
}

/// Combine readings into the composite verdict.
pub fn score(readings: Vec<IndicatorReading>, config: &EngineConfig) -> CompositeSignal {
    let raw_score = weighted_score(&readings, config);

    let volume_multiplier = readings
        .iter()
        .find_map(|r| r.volume_multiplier())
        .unwrap_or(1.0);
    let mut score = raw_score * volume_multiplier;

    if let Some(sr) = readings
        .iter()
        .find(|r| r.kind == IndicatorKind::SupportResistance)
    {
        score *= support_resistance_factor(sr, score, config.support_resistance.modifier_weight);
    }
    let score = score.clamp(-MAX_STRENGTH, MAX_STRENGTH);

    let directional: Vec<&IndicatorReading> = readings
        .iter()
        .filter(|r| counts_for_confidence(r) && r.is_directional())
        .collect();

    let signal = if directional.is_empty() {
        Signal::Hold
    } else if score > config.composite.buy_threshold {
        Signal::Buy
    } else if score < config.composite.sell_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    };

    let confidence = if signal == Signal::Hold {
        0.0
    } else {
        let agreeing = directional.iter().filter(|r| r.signal == signal).count();
        MAX_STRENGTH * agreeing as f64 / directional.len() as f64
    };

    tracing::debug!(
        %signal,
        raw_score,
        score,
        volume_multiplier,
        confidence,
        "composite scored"
    );

    CompositeSignal {
        signal,
        strength: score.abs(),
        confidence,
        score,
        raw_score,
        contributing_readings: readings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{ReadingValues, RsiZone};
    use crate::indicators::{assert_approx, VolumeStatus};

    fn ema(signal: Signal, strength: f64) -> IndicatorReading {
        IndicatorReading::new(
            IndicatorKind::Ema,
            "ema_9_21",
            signal,
            strength,
            ReadingValues::Ema {
                short: 0.0,
                long: 0.0,
                previous_short: 0.0,
                previous_long: 0.0,
                gap: 0.0,
                gap_pct: 0.0,
                crossover: false,
                bars_since_cross: None,
            },
            "",
        )
    }

    fn rsi(signal: Signal, strength: f64) -> IndicatorReading {
        IndicatorReading::new(
            IndicatorKind::Rsi,
            "rsi_14",
            signal,
            strength,
            ReadingValues::Rsi {
                value: 50.0,
                previous: None,
                zone: RsiZone::Neutral,
            },
            "",
        )
    }

    fn volume(multiplier: f64) -> IndicatorReading {
        IndicatorReading::new(
            IndicatorKind::Volume,
            "volume_ratio_20",
            Signal::Hold,
            0.0,
            ReadingValues::Volume {
                current: 1.0,
                average: 1.0,
                ratio: 1.0,
                status: VolumeStatus::Normal,
                multiplier,
            },
            "",
        )
    }

    fn sr(signal: Signal, strength: f64) -> IndicatorReading {
        IndicatorReading::new(
            IndicatorKind::SupportResistance,
            "pivots_50",
            signal,
            strength,
            ReadingValues::SupportResistance {
                support: Some(99.0),
                resistance: Some(101.0),
                pivot: 100.0,
                position: Some(0.5),
            },
            "",
        )
    }

    #[test]
    fn all_hold_is_hold_with_zero_confidence() {
        let c = score(
            vec![ema(Signal::Hold, 3.0), rsi(Signal::Hold, 8.0), volume(1.2), sr(Signal::Hold, 10.0)],
            &EngineConfig::default(),
        );
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.confidence, 0.0);
        assert_eq!(c.score, 0.0);
    }

    #[test]
    fn agreeing_buys() {
        let c = score(
            vec![ema(Signal::Buy, 8.0), rsi(Signal::Buy, 6.0), volume(1.0)],
            &EngineConfig::default(),
        );
        // (0.4*8 + 0.35*6) / 0.75
        assert_approx(c.raw_score, 5.3 / 0.75, 1e-9);
        assert_eq!(c.signal, Signal::Buy);
        assert_eq!(c.confidence, 10.0);
        assert_approx(c.strength, c.raw_score, 1e-9);
    }

    #[test]
    fn disagreement_lowers_confidence() {
        let c = score(
            vec![ema(Signal::Buy, 10.0), rsi(Signal::Sell, 2.0)],
            &EngineConfig::default(),
        );
        // (4 - 0.7) / 0.75 = 4.4
        assert_eq!(c.signal, Signal::Buy);
        assert_eq!(c.confidence, 5.0);
    }

    #[test]
    fn volume_scales_magnitude_only() {
        let config = EngineConfig::default();
        let base = score(vec![ema(Signal::Sell, 5.0), rsi(Signal::Hold, 0.0)], &config);
        let high = score(
            vec![ema(Signal::Sell, 5.0), rsi(Signal::Hold, 0.0), volume(1.2)],
            &config,
        );
        assert!(base.score < 0.0);
        assert_approx(high.score, base.score * 1.2, 1e-9);
    }

    #[test]
    fn low_volume_can_drop_below_threshold() {
        let config = EngineConfig::default();
        // raw = 0.4*4.5/0.75 = 2.4 → BUY; ×0.8 = 1.92 → HOLD
        let c = score(vec![ema(Signal::Buy, 4.5), rsi(Signal::Hold, 0.0), volume(0.8)], &config);
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.confidence, 0.0);
        assert_approx(c.strength, 1.92, 1e-9);
    }

    #[test]
    fn support_resistance_modifies() {
        let config = EngineConfig::default();
        let plain = score(vec![ema(Signal::Buy, 6.0), rsi(Signal::Hold, 0.0)], &config);
        let near_support = score(
            vec![ema(Signal::Buy, 6.0), rsi(Signal::Hold, 0.0), sr(Signal::Buy, 10.0)],
            &config,
        );
        let near_resistance = score(
            vec![ema(Signal::Buy, 6.0), rsi(Signal::Hold, 0.0), sr(Signal::Sell, 10.0)],
            &config,
        );
        let midpoint = score(
            vec![ema(Signal::Buy, 6.0), rsi(Signal::Hold, 0.0), sr(Signal::Hold, 10.0)],
            &config,
        );
        assert_approx(near_support.score, plain.score * 1.2, 1e-9);
        assert_approx(near_resistance.score, plain.score * 0.8, 1e-9);
        assert_approx(midpoint.score, plain.score * 0.8, 1e-9);
        assert_eq!(near_resistance.confidence, 5.0);
    }

    #[test]
    fn score_is_clamped() {
        let c = score(
            vec![ema(Signal::Buy, 10.0), rsi(Signal::Buy, 10.0), volume(1.2), sr(Signal::Buy, 10.0)],
            &EngineConfig::default(),
        );
        assert_eq!(c.score, 10.0);
        assert_eq!(c.strength, 10.0);
    }

    #[test]
    fn insufficient_readings_are_excluded_from_weights() {
        let config = EngineConfig::default();
        let rsi_missing = IndicatorReading::insufficient(IndicatorKind::Rsi, "rsi_14", 15, 10);
        let c = score(vec![ema(Signal::Buy, 3.0), rsi_missing], &config);
        assert_approx(c.raw_score, 3.0, 1e-9);
        assert_eq!(c.signal, Signal::Buy);
        assert_eq!(c.directional_count(), 1);
    }
}
