//! Stop-loss / take-profit levels from ATR.

use crate::config::RiskConfig;
use crate::domain::Signal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_amount: f64,
    pub reward_amount: f64,
    /// `None` when the risk amount is zero ("N/A").
    pub risk_reward_ratio: Option<f64>,
    pub atr_value: f64,
}

impl RiskParameters {
    /// Levels for a directional call. HOLD, or a missing ATR, yields `None`.
    pub fn compute(
        close: f64,
        signal: Signal,
        atr: Option<f64>,
        config: &RiskConfig,
    ) -> Option<Self> {
        let atr = atr.filter(|a| a.is_finite())?;
        let direction = match signal {
            Signal::Hold => return None,
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
        };

        let stop_distance = config.atr_multiplier * atr;
        let stop_loss = close - direction * stop_distance;
        let take_profit = close + direction * stop_distance * config.reward_ratio;

        let risk_amount = (close - stop_loss).abs();
        let reward_amount = (take_profit - close).abs();
        let risk_reward_ratio = (risk_amount > 0.0).then(|| reward_amount / risk_amount);

        Some(Self {
            stop_loss,
            take_profit,
            risk_amount,
            reward_amount,
            risk_reward_ratio,
            atr_value: atr,
        })
    }

    /// Ratio as display text, "N/A" when undefined.
    pub fn ratio_label(&self) -> String {
        self.risk_reward_ratio
            .map_or_else(|| "N/A".to_string(), |r| format!("{r:.2}:1"))
    }
}
