//! Historical replay: evaluate the engine on every prefix of a series and
//! check whether each directional call reached its take-profit or stop-loss
//! first on the bars that followed.
//!
//! Only bars up to the evaluation point are visible to the engine. Outcomes
//! look forward by construction; they are bookkeeping, not inputs.

use aurum_core::engine::evaluate_validated;
use aurum_core::{Bar, EngineConfig, EngineError, Signal, SignalReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{hit_rate, signal_distribution, BasicMetrics};

/// Current schema version for exported replays.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("warmup of {warmup} bars leaves nothing to replay ({available} bars available)")]
    WarmupTooLong { warmup: usize, available: usize },
}

/// Which level a directional call touched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    TakeProfit,
    StopLoss,
    /// Neither level was touched before the series ended.
    Open,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TakeProfit => "take_profit",
            Self::StopLoss => "stop_loss",
            Self::Open => "open",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayPoint {
    /// Index of the evaluated bar in the input series.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub signal: Signal,
    pub strength: f64,
    pub confidence: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    /// Set for directional points that carry risk levels.
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub evaluated: usize,
    pub buys: usize,
    pub sells: usize,
    pub holds: usize,
    pub hits: usize,
    pub stops: usize,
    pub open: usize,
    /// hits / (hits + stops); `None` when nothing resolved.
    pub hit_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub warmup: usize,
    pub bar_count: usize,
    pub config_fingerprint: String,
    pub timeline: Vec<ReplayPoint>,
    pub summary: ReplaySummary,
    pub final_metrics: BasicMetrics,
    pub final_report: SignalReport,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// First level touched by the bars after a call.
///
/// A bar that reaches both levels counts as a stop: the intrabar order is
/// unknown, so the pessimistic reading wins.
pub fn first_touch(signal: Signal, stop_loss: f64, take_profit: f64, later: &[Bar]) -> Outcome {
    for bar in later {
        let (stopped, hit) = match signal {
            Signal::Buy => (bar.low <= stop_loss, bar.high >= take_profit),
            Signal::Sell => (bar.high >= stop_loss, bar.low <= take_profit),
            Signal::Hold => return Outcome::Open,
        };
        if stopped {
            return Outcome::StopLoss;
        }
        if hit {
            return Outcome::TakeProfit;
        }
    }
    Outcome::Open
}

/// Replay `bars` from the first prefix of `warmup` bars to the full series.
///
/// The config and series are validated once up front; a `warmup` of zero is
/// treated as one.
pub fn replay(
    bars: &[Bar],
    config: &EngineConfig,
    warmup: usize,
) -> Result<ReplayResult, ReplayError> {
    config.validate().map_err(EngineError::from)?;
    aurum_core::domain::validate_series(bars).map_err(EngineError::from)?;

    let warmup = warmup.max(1);
    if warmup > bars.len() {
        return Err(ReplayError::WarmupTooLong {
            warmup,
            available: bars.len(),
        });
    }

    let mut timeline = Vec::with_capacity(bars.len() - warmup + 1);
    let mut last_report = None;
    for end in warmup..=bars.len() {
        let index = end - 1;
        let report = evaluate_validated(&bars[..end], config);
        let levels = report.risk.as_ref().map(|r| (r.stop_loss, r.take_profit));
        let outcome = levels
            .filter(|_| report.signal().is_directional())
            .map(|(sl, tp)| first_touch(report.signal(), sl, tp, &bars[end..]));

        timeline.push(ReplayPoint {
            index,
            timestamp: report.timestamp,
            price: report.price,
            signal: report.signal(),
            strength: report.strength(),
            confidence: report.confidence(),
            stop_loss: levels.map(|(sl, _)| sl),
            take_profit: levels.map(|(_, tp)| tp),
            outcome,
        });
        last_report = Some(report);
    }

    // warmup <= bars.len() guarantees at least one evaluation.
    let final_report = match last_report {
        Some(report) => report,
        None => {
            return Err(ReplayError::WarmupTooLong {
                warmup,
                available: bars.len(),
            })
        }
    };

    let summary = summarize(&timeline);
    tracing::info!(
        evaluated = summary.evaluated,
        buys = summary.buys,
        sells = summary.sells,
        hits = summary.hits,
        stops = summary.stops,
        "replay complete"
    );

    Ok(ReplayResult {
        schema_version: SCHEMA_VERSION,
        warmup,
        bar_count: bars.len(),
        config_fingerprint: config.fingerprint(),
        summary,
        final_metrics: BasicMetrics::from_report(&final_report),
        final_report,
        timeline,
    })
}

pub fn summarize(timeline: &[ReplayPoint]) -> ReplaySummary {
    let (buys, sells, holds) = signal_distribution(timeline.iter().map(|p| p.signal));
    let count = |o: Outcome| timeline.iter().filter(|p| p.outcome == Some(o)).count();
    let hits = count(Outcome::TakeProfit);
    let stops = count(Outcome::StopLoss);
    ReplaySummary {
        evaluated: timeline.len(),
        buys,
        sells,
        holds,
        hits,
        stops,
        open: count(Outcome::Open),
        hit_rate: hit_rate(hits, stops),
    }
}
