//! Aurum Core — signal engine for a single commodity instrument.
//!
//! - Domain types (bars, signals, timeframes) and the input contract
//! - Indicator library (EMA, RSI, ATR, volume ratio, pivot support/resistance)
//! - Per-indicator evaluation into readings
//! - Composite scoring, ATR risk levels, and the signal report
//! - Data-source collaborators behind the `DataProvider` trait

pub mod composite;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod evaluator;
pub mod indicators;
pub mod report;
pub mod risk;

pub use composite::CompositeSignal;
pub use config::{ConfigError, EngineConfig};
pub use domain::{Bar, InputError, Signal, Timeframe};
pub use engine::{evaluate, EngineError};
pub use evaluator::{IndicatorKind, IndicatorReading, ReadingValues};
pub use report::{Recommendation, SignalReport};
pub use risk::RiskParameters;
