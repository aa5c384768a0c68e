//! Signal report: the immutable result of one evaluation.

use crate::composite::CompositeSignal;
use crate::domain::Signal;
use crate::evaluator::{IndicatorKind, IndicatorReading};
use crate::risk::RiskParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Graded call derived from signal and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    WeakBuy,
    Hold,
    WeakSell,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn from_composite(composite: &CompositeSignal) -> Self {
        let grade = |strong, normal, weak| {
            if composite.confidence >= 7.0 {
                strong
            } else if composite.confidence >= 5.0 {
                normal
            } else {
                weak
            }
        };
        match composite.signal {
            Signal::Buy => grade(Self::StrongBuy, Self::Buy, Self::WeakBuy),
            Signal::Sell => grade(Self::StrongSell, Self::Sell, Self::WeakSell),
            Signal::Hold => Self::Hold,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::WeakBuy => "WEAK BUY",
            Self::Hold => "HOLD",
            Self::WeakSell => "WEAK SELL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    /// Timestamp of the bar the report was evaluated at.
    pub timestamp: DateTime<Utc>,
    /// Close of that bar.
    pub price: f64,
    pub composite: CompositeSignal,
    /// Present only for directional calls with a valid ATR.
    pub risk: Option<RiskParameters>,
    pub atr: Option<f64>,
    /// Fingerprint of the configuration used.
    pub config_fingerprint: String,
}

impl SignalReport {
    pub fn signal(&self) -> Signal {
        self.composite.signal
    }

    pub fn strength(&self) -> f64 {
        self.composite.strength
    }

    pub fn confidence(&self) -> f64 {
        self.composite.confidence
    }

    pub fn readings(&self) -> &[IndicatorReading] {
        &self.composite.contributing_readings
    }

    pub fn ema(&self) -> Option<&IndicatorReading> {
        self.composite.reading(IndicatorKind::Ema)
    }

    pub fn rsi(&self) -> Option<&IndicatorReading> {
        self.composite.reading(IndicatorKind::Rsi)
    }

    pub fn volume(&self) -> Option<&IndicatorReading> {
        self.composite.reading(IndicatorKind::Volume)
    }

    pub fn support_resistance(&self) -> Option<&IndicatorReading> {
        self.composite.reading(IndicatorKind::SupportResistance)
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_composite(&self.composite)
    }
}
