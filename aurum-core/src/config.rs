//! Engine configuration.
//!
//! An `EngineConfig` is passed explicitly into every evaluation. Every section
//! and field has a default, so partial TOML documents are accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field}: period must be at least 1")]
    InvalidPeriod { field: &'static str },

    #[error("{field}: {value} exceeds the maximum of {max} bars")]
    PeriodTooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("ema: short period ({short}) must be below long period ({long})")]
    EmaPeriodsOrder { short: usize, long: usize },

    #[error("rsi: thresholds must satisfy 0 < oversold ({oversold}) < overbought ({overbought}) < 100")]
    RsiThresholds { oversold: f64, overbought: f64 },

    #[error("volume: thresholds must satisfy 0 <= low ({low}) < high ({high})")]
    VolumeThresholds { low: f64, high: f64 },

    #[error("{field} must be finite and non-negative (got {value})")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("{field} must be finite and positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("composite: at least one weight must be positive")]
    ZeroWeights,

    #[error("composite: buy threshold ({buy}) must be above sell threshold ({sell})")]
    ThresholdOrder { buy: f64, sell: f64 },

    #[error("support_resistance: near_zone must lie in [0, 0.5] (got {0})")]
    NearZone(f64),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaConfig {
    pub short_period: usize,
    pub long_period: usize,
    /// Strength points per unit of relative gap (|gap| / close).
    pub gap_scale: f64,
    /// How many recent bars a crossover stays actionable.
    pub cross_lookback: usize,
    /// Minimum gap, in percent of price, for a trend-continuation call.
    pub trend_min_gap_pct: f64,
    /// Strength multiplier for calls made without a fresh crossover.
    pub trend_strength_factor: f64,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self {
            short_period: 9,
            long_period: 21,
            gap_scale: 200.0,
            cross_lookback: 3,
            trend_min_gap_pct: 0.5,
            trend_strength_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtrConfig {
    pub period: usize,
}

impl Default for AtrConfig {
    fn default() -> Self {
        Self { period: 14 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub lookback: usize,
    pub high_ratio: f64,
    pub low_ratio: f64,
    pub high_multiplier: f64,
    pub low_multiplier: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            high_ratio: 1.5,
            low_ratio: 0.5,
            high_multiplier: 1.2,
            low_multiplier: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportResistanceConfig {
    pub lookback: usize,
    /// Bars on each side a pivot must dominate (2 → 5-bar neighbourhood).
    pub pivot_radius: usize,
    /// Fraction of the support-resistance spacing that counts as "near" a level.
    pub near_zone: f64,
    /// Maximum relative change the reading applies to the composite score.
    pub modifier_weight: f64,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            lookback: 50,
            pivot_radius: 2,
            near_zone: 0.2,
            modifier_weight: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub ema_weight: f64,
    pub rsi_weight: f64,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            ema_weight: 0.4,
            rsi_weight: 0.35,
            buy_threshold: 2.0,
            sell_threshold: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub atr_multiplier: f64,
    pub reward_ratio: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            atr_multiplier: 2.0,
            reward_ratio: 2.0,
        }
    }
}

/// Full parameter set for one evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ema: EmaConfig,
    pub rsi: RsiConfig,
    pub atr: AtrConfig,
    pub volume: VolumeConfig,
    pub support_resistance: SupportResistanceConfig,
    pub composite: CompositeConfig,
    pub risk: RiskConfig,
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Upper bound on any period, lookback or radius, in bars.
pub const MAX_PERIOD: usize = 10_000;

fn bounded(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value > MAX_PERIOD {
        Err(ConfigError::PeriodTooLarge {
            field,
            value,
            max: MAX_PERIOD,
        })
    } else {
        Ok(())
    }
}

fn period(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidPeriod { field });
    }
    bounded(field, value)
}

impl EngineConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ema = &self.ema;
        period("ema.short_period", ema.short_period)?;
        period("ema.long_period", ema.long_period)?;
        period("ema.cross_lookback", ema.cross_lookback)?;
        if ema.short_period >= ema.long_period {
            return Err(ConfigError::EmaPeriodsOrder {
                short: ema.short_period,
                long: ema.long_period,
            });
        }
        non_negative("ema.gap_scale", ema.gap_scale)?;
        non_negative("ema.trend_min_gap_pct", ema.trend_min_gap_pct)?;
        non_negative("ema.trend_strength_factor", ema.trend_strength_factor)?;

        let rsi = &self.rsi;
        period("rsi.period", rsi.period)?;
        let ordered = rsi.oversold > 0.0 && rsi.oversold < rsi.overbought && rsi.overbought < 100.0;
        if !ordered {
            return Err(ConfigError::RsiThresholds {
                oversold: rsi.oversold,
                overbought: rsi.overbought,
            });
        }

        period("atr.period", self.atr.period)?;

        let vol = &self.volume;
        period("volume.lookback", vol.lookback)?;
        if !(vol.low_ratio >= 0.0 && vol.low_ratio < vol.high_ratio && vol.high_ratio.is_finite()) {
            return Err(ConfigError::VolumeThresholds {
                low: vol.low_ratio,
                high: vol.high_ratio,
            });
        }
        non_negative("volume.high_multiplier", vol.high_multiplier)?;
        non_negative("volume.low_multiplier", vol.low_multiplier)?;

        let sr = &self.support_resistance;
        period("support_resistance.lookback", sr.lookback)?;
        bounded("support_resistance.pivot_radius", sr.pivot_radius)?;
        if !(0.0..=0.5).contains(&sr.near_zone) {
            return Err(ConfigError::NearZone(sr.near_zone));
        }
        non_negative("support_resistance.modifier_weight", sr.modifier_weight)?;

        let comp = &self.composite;
        non_negative("composite.ema_weight", comp.ema_weight)?;
        non_negative("composite.rsi_weight", comp.rsi_weight)?;
        if comp.ema_weight + comp.rsi_weight <= 0.0 {
            return Err(ConfigError::ZeroWeights);
        }
        if !(comp.buy_threshold > comp.sell_threshold) {
            return Err(ConfigError::ThresholdOrder {
                buy: comp.buy_threshold,
                sell: comp.sell_threshold,
            });
        }

        positive("risk.atr_multiplier", self.risk.atr_multiplier)?;
        positive("risk.reward_ratio", self.risk.reward_ratio)?;
        Ok(())
    }

    /// BLAKE3 hex digest of the canonical JSON form.
    ///
    /// Field order is fixed by the struct definitions, so equal configs always
    /// hash equal.
    pub fn fingerprint(&self) -> String {
        match serde_json::to_vec(self) {
            Ok(json) => blake3::hash(&json).to_hex().to_string(),
            // Plain structs of numbers cannot fail to serialize; hash the debug
            // form rather than panic.
            Err(_) => blake3::hash(format!("{self:?}").as_bytes()).to_hex().to_string(),
        }
    }

    /// Render as pretty TOML for display.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
