//! Engine entry point: bar series + config in, signal report out.

use crate::composite;
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{validate_series, Bar, InputError};
use crate::evaluator::evaluate_readings;
use crate::indicators::{latest_valid, Atr, Indicator};
use crate::report::SignalReport;
use crate::risk::RiskParameters;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Evaluate the series at its newest bar.
///
/// Rejects invalid configs and series; any valid series produces a report,
/// with short histories showing up as insufficient-data readings.
pub fn evaluate(bars: &[Bar], config: &EngineConfig) -> Result<SignalReport, EngineError> {
    config.validate()?;
    validate_series(bars)?;
    Ok(evaluate_validated(bars, config))
}

/// Evaluate a series the caller has already validated against `config`.
///
/// Used by replay loops that validate once and evaluate every prefix.
pub fn evaluate_validated(bars: &[Bar], config: &EngineConfig) -> SignalReport {
    let readings = evaluate_readings(bars, config);
    let composite = composite::score(readings, config);

    let atr = latest_valid(&Atr::new(config.atr.period).compute(bars));
    let (timestamp, price) = match bars.last() {
        Some(last) => (last.timestamp, last.close),
        None => (chrono::DateTime::<chrono::Utc>::default(), f64::NAN),
    };
    let risk = RiskParameters::compute(price, composite.signal, atr, &config.risk);

    tracing::debug!(
        bars = bars.len(),
        %timestamp,
        signal = %composite.signal,
        strength = composite.strength,
        confidence = composite.confidence,
        "evaluated"
    );

    SignalReport {
        timestamp,
        price,
        composite,
        risk,
        atr,
        config_fingerprint: config.fingerprint(),
    }
}
