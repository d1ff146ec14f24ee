//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recommended trading action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Scored trading signal. Produced fresh per evaluation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    /// Recommended action
    pub action: Action,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Raw weighted score
    pub signal_strength: f64,
    /// Named sub-scores that make up the strength
    pub component_scores: BTreeMap<String, f64>,
}

impl TradingSignal {
    /// The fallback signal: HOLD with zero confidence and zeroed scores.
    pub fn neutral() -> Self {
        let component_scores = [("risk_score", 0.0), ("liquidity_score", 0.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            action: Action::Hold,
            confidence: 0.0,
            signal_strength: 0.0,
            component_scores,
        }
    }

    /// Look up a component score, 0.0 when absent.
    pub fn component(&self, name: &str) -> f64 {
        self.component_scores.get(name).copied().unwrap_or(0.0)
    }

    /// Whether the signal asks for a trade.
    pub fn is_actionable(&self) -> bool {
        self.action != Action::Hold
    }
}

impl Default for TradingSignal {
    fn default() -> Self {
        Self::neutral()
    }
}
