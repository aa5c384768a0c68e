//! Volume ratio: current volume relative to its rolling average.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeStatus {
    High,
    Normal,
    Low,
}

impl fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VolumeStatus::High => "HIGH",
            VolumeStatus::Normal => "NORMAL",
            VolumeStatus::Low => "LOW",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeRatio {
    pub current: f64,
    pub average: f64,
    pub ratio: f64,
    pub status: VolumeStatus,
}

/// Volume of the last bar over the mean volume of the last `lookback` bars
/// (the last bar included).
///
/// Returns `None` when fewer than `lookback` bars are available. A zero
/// average yields ratio 1.0.
pub fn volume_ratio(
    bars: &[Bar],
    lookback: usize,
    high_threshold: f64,
    low_threshold: f64,
) -> Option<VolumeRatio> {
    if lookback == 0 || bars.len() < lookback {
        return None;
    }
    let window = &bars[bars.len() - lookback..];
    let current = window.last()?.volume as f64;
    let average = window.iter().map(|b| b.volume as f64).sum::<f64>() / lookback as f64;
    let ratio = if average > 0.0 { current / average } else { 1.0 };

    let status = if ratio > high_threshold {
        VolumeStatus::High
    } else if ratio < low_threshold {
        VolumeStatus::Low
    } else {
        VolumeStatus::Normal
    };

    Some(VolumeRatio {
        current,
        average,
        ratio,
        status,
    })
}
