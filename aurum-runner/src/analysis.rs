//! Single and multi-timeframe analysis on top of a data provider.

use anyhow::{Context, Result};
use aurum_core::data::{DataProvider, DataSource};
use aurum_core::{evaluate, EngineConfig, Signal, SignalReport, Timeframe};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One evaluated series and where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub source: DataSource,
    pub bar_count: usize,
    pub report: SignalReport,
}

/// Fetch bars for `symbol` at `timeframe` and evaluate them.
pub fn analyze(
    provider: &dyn DataProvider,
    symbol: &str,
    timeframe: Timeframe,
    config: &EngineConfig,
) -> Result<Analysis> {
    let fetched = provider
        .fetch(symbol, timeframe)
        .with_context(|| format!("failed to fetch {symbol} ({timeframe})"))?;
    let report = evaluate(&fetched.bars, config)
        .with_context(|| format!("failed to evaluate {symbol} ({timeframe})"))?;

    tracing::info!(
        symbol,
        %timeframe,
        source = %fetched.source,
        bars = fetched.bars.len(),
        signal = %report.signal(),
        strength = report.strength(),
        "analysis complete"
    );

    Ok(Analysis {
        symbol: symbol.to_string(),
        timeframe,
        source: fetched.source,
        bar_count: fetched.bars.len(),
        report,
    })
}

/// Agreement across timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Consensus {
    Buy,
    Sell,
    Mixed,
    NoData,
}

impl Consensus {
    /// BUY or SELL when that signal strictly outnumbers both others.
    pub fn from_signals(signals: impl IntoIterator<Item = Signal>) -> Self {
        let (mut buy, mut sell, mut hold) = (0usize, 0usize, 0usize);
        for signal in signals {
            match signal {
                Signal::Buy => buy += 1,
                Signal::Sell => sell += 1,
                Signal::Hold => hold += 1,
            }
        }
        if buy + sell + hold == 0 {
            Self::NoData
        } else if buy > sell && buy > hold {
            Self::Buy
        } else if sell > buy && sell > hold {
            Self::Sell
        } else {
            Self::Mixed
        }
    }
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Mixed => "MIXED",
            Self::NoData => "NO DATA",
        })
    }
}

/// Outcome for one timeframe of a multi-timeframe run.
#[derive(Debug)]
pub struct TimeframeOutcome {
    pub timeframe: Timeframe,
    pub result: Result<Analysis>,
}

#[derive(Debug)]
pub struct MultiTimeframeAnalysis {
    pub symbol: String,
    /// In the order the timeframes were requested.
    pub outcomes: Vec<TimeframeOutcome>,
    pub consensus: Consensus,
}

impl MultiTimeframeAnalysis {
    pub fn successes(&self) -> impl Iterator<Item = &Analysis> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (Timeframe, &anyhow::Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.timeframe, e)))
    }
}

/// Analyze several timeframes in parallel. A failing timeframe is recorded
/// and does not abort the others.
pub fn analyze_timeframes(
    provider: &dyn DataProvider,
    symbol: &str,
    timeframes: &[Timeframe],
    config: &EngineConfig,
) -> MultiTimeframeAnalysis {
    let outcomes: Vec<TimeframeOutcome> = timeframes
        .par_iter()
        .map(|&timeframe| TimeframeOutcome {
            timeframe,
            result: analyze(provider, symbol, timeframe, config),
        })
        .collect();

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            tracing::warn!(symbol, timeframe = %outcome.timeframe, error = %e, "timeframe failed");
        }
    }

    let consensus = Consensus::from_signals(
        outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|a| a.report.signal()),
    );

    MultiTimeframeAnalysis {
        symbol: symbol.to_string(),
        outcomes,
        consensus,
    }
}
