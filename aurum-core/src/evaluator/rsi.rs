//! RSI reversal classification.

use super::{IndicatorKind, IndicatorReading, ReadingValues, RsiZone};
use crate::config::RsiConfig;
use crate::domain::{Bar, Signal};
use crate::indicators::{latest_valid, previous_valid, Indicator, Rsi};

pub fn evaluate(bars: &[Bar], config: &RsiConfig) -> IndicatorReading {
    let rsi = Rsi::new(config.period);
    let name = rsi.name().to_string();
    let series = rsi.compute(bars);

    let Some(value) = latest_valid(&series) else {
        return IndicatorReading::insufficient(
            IndicatorKind::Rsi,
            name,
            rsi.required_bars(),
            bars.len(),
        );
    };
    let previous = previous_valid(&series);

    let zone = if value < config.oversold {
        RsiZone::Oversold
    } else if value > config.overbought {
        RsiZone::Overbought
    } else {
        RsiZone::Neutral
    };
    let strength = (value - 50.0).abs() / 5.0;

    let (signal, rationale) = match (zone, previous) {
        (RsiZone::Oversold, Some(prev)) if value > prev => (
            Signal::Buy,
            format!("RSI {value:.1} oversold and turning up from {prev:.1}"),
        ),
        (RsiZone::Overbought, Some(prev)) if value < prev => (
            Signal::Sell,
            format!("RSI {value:.1} overbought and turning down from {prev:.1}"),
        ),
        (RsiZone::Oversold, _) => (
            Signal::Hold,
            format!("RSI {value:.1} oversold, not yet turning up"),
        ),
        (RsiZone::Overbought, _) => (
            Signal::Hold,
            format!("RSI {value:.1} overbought, not yet turning down"),
        ),
        (RsiZone::Neutral, _) => (Signal::Hold, format!("RSI {value:.1} neutral")),
    };

    IndicatorReading::new(
        IndicatorKind::Rsi,
        name,
        signal,
        strength,
        ReadingValues::Rsi {
            value,
            previous,
            zone,
        },
        rationale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn rsi_value(reading: &IndicatorReading) -> f64 {
        match reading.values {
            ReadingValues::Rsi { value, .. } => value,
            ref other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn flat_is_neutral_hold() {
        let reading = evaluate(&make_bars(&[100.0; 30]), &RsiConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert_approx(rsi_value(&reading), 50.0, DEFAULT_EPSILON);
        assert_eq!(reading.strength, 0.0);
    }

    #[test]
    fn ramp_is_overbought_but_not_turning() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let reading = evaluate(&make_bars(&closes), &RsiConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert_eq!(rsi_value(&reading), 100.0);
        assert_eq!(reading.strength, 10.0);
    }

    #[test]
    fn oversold_turning_up_is_buy() {
        let mut closes: Vec<f64> = (0..20).map(|i| 120.0 - i as f64).collect();
        closes.push(101.5);
        let reading = evaluate(&make_bars(&closes), &RsiConfig::default());
        assert_eq!(reading.signal, Signal::Buy);
        assert!(rsi_value(&reading) < 30.0);
        assert!(reading.strength > 4.0);
    }

    #[test]
    fn overbought_turning_down_is_sell() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        closes.push(118.5);
        let reading = evaluate(&make_bars(&closes), &RsiConfig::default());
        assert_eq!(reading.signal, Signal::Sell);
        assert!(rsi_value(&reading) > 70.0);
    }

    #[test]
    fn first_value_has_no_previous() {
        // exactly period + 1 closes: one RSI value, no turning check possible
        let closes: Vec<f64> = (0..15).map(|i| 120.0 - i as f64).collect();
        let reading = evaluate(&make_bars(&closes), &RsiConfig::default());
        assert_eq!(reading.signal, Signal::Hold);
        assert!(matches!(
            reading.values,
            ReadingValues::Rsi { previous: None, zone: RsiZone::Oversold, .. }
        ));
    }

    #[test]
    fn too_short_is_insufficient() {
        let reading = evaluate(&make_bars(&[100.0; 14]), &RsiConfig::default());
        assert!(reading.is_insufficient());
    }
}
