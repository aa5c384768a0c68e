//! Indicator evaluator: classifies raw indicator output into readings.
//!
//! Each evaluator maps one indicator to a directional signal, a strength in
//! [0, 10], an indicator-specific payload and a one-line rationale. An
//! indicator without enough history yields an insufficient-data reading
//! (HOLD, strength 0) instead of an error.

pub mod ema;
pub mod rsi;
pub mod support_resistance;
pub mod volume;

use crate::config::EngineConfig;
use crate::domain::{Bar, Signal};
use crate::indicators::VolumeStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_STRENGTH: f64 = 10.0;

pub(crate) fn clamp_strength(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_STRENGTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Ema,
    Rsi,
    Volume,
    SupportResistance,
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Volume => "Volume",
            IndicatorKind::SupportResistance => "Support/Resistance",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

/// Indicator-specific payload of a reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReadingValues {
    Ema {
        short: f64,
        long: f64,
        previous_short: f64,
        previous_long: f64,
        gap: f64,
        gap_pct: f64,
        crossover: bool,
        bars_since_cross: Option<usize>,
    },
    Rsi {
        value: f64,
        previous: Option<f64>,
        zone: RsiZone,
    },
    Volume {
        current: f64,
        average: f64,
        ratio: f64,
        status: VolumeStatus,
        multiplier: f64,
    },
    SupportResistance {
        support: Option<f64>,
        resistance: Option<f64>,
        pivot: f64,
        position: Option<f64>,
    },
    Insufficient {
        required: usize,
        available: usize,
    },
}

/// One classified indicator at one evaluation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub kind: IndicatorKind,
    pub name: String,
    pub signal: Signal,
    pub strength: f64,
    pub values: ReadingValues,
    pub rationale: String,
}

impl IndicatorReading {
    pub(crate) fn new(
        kind: IndicatorKind,
        name: impl Into<String>,
        signal: Signal,
        strength: f64,
        values: ReadingValues,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            signal,
            strength: clamp_strength(strength),
            values,
            rationale: rationale.into(),
        }
    }

    pub(crate) fn insufficient(
        kind: IndicatorKind,
        name: impl Into<String>,
        required: usize,
        available: usize,
    ) -> Self {
        Self::new(
            kind,
            name,
            Signal::Hold,
            0.0,
            ReadingValues::Insufficient {
                required,
                available,
            },
            format!("insufficient data: {available} of {required} bars"),
        )
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self.values, ReadingValues::Insufficient { .. })
    }

    pub fn is_directional(&self) -> bool {
        self.signal.is_directional()
    }

    /// BUY → +strength, SELL → −strength, HOLD → 0.
    pub fn signed_score(&self) -> f64 {
        self.signal.sign() * self.strength
    }

    /// Volume confirmation multiplier carried by a volume reading.
    pub fn volume_multiplier(&self) -> Option<f64> {
        match self.values {
            ReadingValues::Volume { multiplier, .. } => Some(multiplier),
            _ => None,
        }
    }
}

/// Evaluate every indicator, ordered EMA, RSI, volume, support/resistance.
pub fn evaluate_readings(bars: &[Bar], config: &EngineConfig) -> Vec<IndicatorReading> {
    let readings = vec![
        ema::evaluate(bars, &config.ema),
        rsi::evaluate(bars, &config.rsi),
        volume::evaluate(bars, &config.volume),
        support_resistance::evaluate(bars, &config.support_resistance),
    ];
    for r in &readings {
        tracing::trace!(
            indicator = %r.kind,
            signal = %r.signal,
            strength = r.strength,
            rationale = %r.rationale,
            "indicator reading"
        );
    }
    readings
}
