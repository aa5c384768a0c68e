//! Export: JSON for reports and replays, CSV for replay timelines.
//!
//! Persisted replays carry a `schema_version`; unknown versions are rejected
//! on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use aurum_core::SignalReport;

use crate::replay::{ReplayPoint, ReplayResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SignalReport` to pretty JSON.
pub fn report_json(report: &SignalReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize SignalReport to JSON")
}

/// Serialize a `ReplayResult` to pretty JSON.
pub fn replay_json(result: &ReplayResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ReplayResult to JSON")
}

/// Deserialize a `ReplayResult` from JSON, rejecting unknown schema versions.
pub fn import_replay_json(json: &str) -> Result<ReplayResult> {
    let result: ReplayResult =
        serde_json::from_str(json).context("failed to deserialize ReplayResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

/// Export a replay timeline as CSV.
///
/// Columns: index, timestamp, price, signal, strength, confidence,
/// stop_loss, take_profit, outcome
pub fn timeline_csv(timeline: &[ReplayPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "index",
        "timestamp",
        "price",
        "signal",
        "strength",
        "confidence",
        "stop_loss",
        "take_profit",
        "outcome",
    ])?;

    for p in timeline {
        wtr.write_record([
            p.index.to_string(),
            p.timestamp.to_rfc3339(),
            format!("{:.4}", p.price),
            p.signal.as_str().to_string(),
            format!("{:.2}", p.strength),
            format!("{:.2}", p.confidence),
            opt(p.stop_loss),
            opt(p.take_profit),
            p.outcome.map(|o| o.as_str()).unwrap_or("").to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for one replay.
///
/// Creates `{label}_{last bar time}/` under `output_dir` containing
/// `replay.json` (the full `ReplayResult`) and `timeline.csv`. The directory
/// name comes from the data, so re-running on the same bars overwrites the
/// same bundle.
pub fn save_replay(result: &ReplayResult, label: &str, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        label,
        result.final_report.timestamp.format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = replay_json(result)?;
    std::fs::write(run_dir.join("replay.json"), json)
        .with_context(|| format!("failed to write replay.json in {}", run_dir.display()))?;

    let csv = timeline_csv(&result.timeline)?;
    std::fs::write(run_dir.join("timeline.csv"), csv)
        .with_context(|| format!("failed to write timeline.csv in {}", run_dir.display()))?;

    tracing::info!(dir = %run_dir.display(), "replay artifacts saved");
    Ok(run_dir)
}

/// Load a `ReplayResult` from an artifact directory.
pub fn load_replay(dir: &Path) -> Result<ReplayResult> {
    let path = dir.join("replay.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_replay_json(&json)
}
