//! Aurum Runner — orchestration on top of `aurum-core`.
//!
//! This crate provides:
//! - Analyzer settings and the provider fallback chain they describe
//! - Single analysis and parallel multi-timeframe analysis with consensus
//! - Historical replay with first-touch outcomes
//! - Basic metrics and JSON/CSV export

pub mod analysis;
pub mod export;
pub mod metrics;
pub mod replay;
pub mod settings;

pub use analysis::{
    analyze, analyze_timeframes, Analysis, Consensus, MultiTimeframeAnalysis, TimeframeOutcome,
};
pub use export::{
    import_replay_json, load_replay, replay_json, report_json, save_replay, timeline_csv,
};
pub use metrics::BasicMetrics;
pub use replay::{replay, Outcome, ReplayError, ReplayPoint, ReplayResult, ReplaySummary};
pub use settings::{AnalyzerSettings, DataSettings, SourceMode};
