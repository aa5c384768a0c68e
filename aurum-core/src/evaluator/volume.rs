//! Volume confirmation. Never directional; carries the multiplier the
//! composite scorer applies to the prevailing score.

use super::{IndicatorKind, IndicatorReading, ReadingValues};
use crate::config::VolumeConfig;
use crate::domain::{Bar, Signal};
use crate::indicators::{volume_ratio, VolumeStatus};

pub fn evaluate(bars: &[Bar], config: &VolumeConfig) -> IndicatorReading {
    let name = format!("volume_ratio_{}", config.lookback);
    let Some(vr) = volume_ratio(bars, config.lookback, config.high_ratio, config.low_ratio) else {
        return IndicatorReading::insufficient(
            IndicatorKind::Volume,
            name,
            config.lookback,
            bars.len(),
        );
    };

    let multiplier = match vr.status {
        VolumeStatus::High => config.high_multiplier,
        VolumeStatus::Low => config.low_multiplier,
        VolumeStatus::Normal => 1.0,
    };
    let rationale = format!(
        "volume {} ({:.2}x the {}-bar average)",
        vr.status, vr.ratio, config.lookback
    );

    IndicatorReading::new(
        IndicatorKind::Volume,
        name,
        Signal::Hold,
        (vr.ratio - 1.0).abs() * 10.0,
        ReadingValues::Volume {
            current: vr.current,
            average: vr.average,
            ratio: vr.ratio,
            status: vr.status,
            multiplier,
        },
        rationale,
    )
}
