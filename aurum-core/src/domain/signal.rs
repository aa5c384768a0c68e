//! Directional call shared by indicator readings and the composite.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// +1 for BUY, -1 for SELL, 0 for HOLD.
    pub fn sign(self) -> f64 {
        match self {
            Signal::Buy => 1.0,
            Signal::Sell => -1.0,
            Signal::Hold => 0.0,
        }
    }

    pub fn is_directional(self) -> bool {
        self != Signal::Hold
    }

    /// Signal matching the sign of a score; zero maps to HOLD.
    pub fn from_sign(score: f64) -> Self {
        if score > 0.0 {
            Signal::Buy
        } else if score < 0.0 {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs() {
        assert_eq!(Signal::Buy.sign(), 1.0);
        assert_eq!(Signal::Sell.sign(), -1.0);
        assert_eq!(Signal::Hold.sign(), 0.0);
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Signal::Buy).unwrap(), "\"BUY\"");
        let s: Signal = serde_json::from_str("\"HOLD\"").unwrap();
        assert_eq!(s, Signal::Hold);
    }

    #[test]
    fn from_sign_zero_is_hold() {
        assert_eq!(Signal::from_sign(0.0), Signal::Hold);
        assert_eq!(Signal::from_sign(-0.1), Signal::Sell);
    }
}
