//! Basic metrics as pure functions over a report or a replay timeline.

use aurum_core::{Recommendation, Signal, SignalReport};
use serde::{Deserialize, Serialize};

/// Headline numbers of a single report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicMetrics {
    pub signal: Signal,
    pub recommendation: Recommendation,
    pub strength: f64,
    pub confidence: f64,
    /// `None` for HOLD or when the ratio is undefined.
    pub risk_reward_ratio: Option<f64>,
    /// Distance from price to stop-loss.
    pub potential_risk: Option<f64>,
    /// Distance from price to take-profit.
    pub potential_reward: Option<f64>,
}

impl BasicMetrics {
    pub fn from_report(report: &SignalReport) -> Self {
        let risk = report.risk.as_ref();
        Self {
            signal: report.signal(),
            recommendation: report.recommendation(),
            strength: report.strength(),
            confidence: report.confidence(),
            risk_reward_ratio: risk.and_then(|r| r.risk_reward_ratio),
            potential_risk: risk.map(|r| r.risk_amount),
            potential_reward: risk.map(|r| r.reward_amount),
        }
    }
}

/// Count of each signal in order BUY, SELL, HOLD.
pub fn signal_distribution(signals: impl IntoIterator<Item = Signal>) -> (usize, usize, usize) {
    signals
        .into_iter()
        .fold((0, 0, 0), |(b, s, h), signal| match signal {
            Signal::Buy => (b + 1, s, h),
            Signal::Sell => (b, s + 1, h),
            Signal::Hold => (b, s, h + 1),
        })
}

/// Share of resolved calls that reached take-profit first.
///
/// `None` when nothing resolved.
pub fn hit_rate(hits: usize, stops: usize) -> Option<f64> {
    let resolved = hits + stops;
    (resolved > 0).then(|| hits as f64 / resolved as f64)
}
