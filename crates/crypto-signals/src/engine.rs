//! Weighted signal scoring.

use crypto_core::error::{IndicatorError, SignalError};
use crypto_core::types::{Action, TradingSignal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::inputs::{LiquidityMetrics, RiskMetrics, TechnicalIndicators};

/// Weights and thresholds for signal scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    /// Contribution of an oversold/overbought RSI
    pub rsi_weight: f64,
    /// RSI below this is oversold (bullish)
    pub rsi_oversold: f64,
    /// RSI above this is overbought (bearish)
    pub rsi_overbought: f64,
    /// Contribution of the MACD histogram sign
    pub macd_weight: f64,
    /// Maximum contribution of low Value-at-Risk
    pub risk_weight: f64,
    /// VaR magnitude at which the risk contribution reaches zero
    pub var_cap: f64,
    /// Maximum contribution of market depth
    pub liquidity_weight: f64,
    /// Depth at which the liquidity contribution saturates
    pub depth_target: f64,
    /// Strength strictly above this is a BUY
    pub buy_threshold: f64,
    /// Strength strictly below this is a SELL
    pub sell_threshold: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            rsi_weight: 0.4,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_weight: 0.2,
            risk_weight: 0.3,
            var_cap: 0.1,
            liquidity_weight: 0.3,
            depth_target: 100_000.0,
            buy_threshold: 0.3,
            sell_threshold: -0.3,
        }
    }
}

impl SignalWeights {
    /// Validate the weights.
    pub fn validate(&self) -> Result<(), SignalError> {
        let weights = [
            ("rsi_weight", self.rsi_weight),
            ("macd_weight", self.macd_weight),
            ("risk_weight", self.risk_weight),
            ("liquidity_weight", self.liquidity_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SignalError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {weight}"
                )));
            }
        }
        if !(self.rsi_oversold < self.rsi_overbought) {
            return Err(SignalError::InvalidConfig(
                "RSI oversold level must be below the overbought level".into(),
            ));
        }
        if !(self.var_cap > 0.0) || !(self.depth_target > 0.0) {
            return Err(SignalError::InvalidConfig(
                "VaR cap and depth target must be positive".into(),
            ));
        }
        if !(self.sell_threshold <= self.buy_threshold) {
            return Err(SignalError::InvalidConfig(
                "Sell threshold must not exceed buy threshold".into(),
            ));
        }
        Ok(())
    }
}

/// Combines indicator, risk and liquidity inputs into a trading signal.
///
/// Evaluation is a pure function of the inputs and the weights.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    weights: SignalWeights,
}

impl SignalEngine {
    /// Create an engine with custom weights.
    pub fn new(weights: SignalWeights) -> Self {
        Self { weights }
    }

    /// Get the weights.
    pub fn weights(&self) -> &SignalWeights {
        &self.weights
    }

    /// Score the inputs into a signal.
    ///
    /// Never fails: a scoring fault is logged and yields
    /// [`TradingSignal::neutral`].
    pub fn evaluate(
        &self,
        technical: &TechnicalIndicators,
        risk: &RiskMetrics,
        liquidity: &LiquidityMetrics,
    ) -> TradingSignal {
        match self.score(technical, risk, liquidity) {
            Ok(signal) => {
                debug!(
                    "Signal {} strength={:.4} confidence={:.4}",
                    signal.action, signal.signal_strength, signal.confidence
                );
                signal
            }
            Err(e) => {
                warn!("Signal scoring failed, holding: {}", e);
                TradingSignal::neutral()
            }
        }
    }

    /// Score the inputs, reporting non-finite inputs as an error.
    pub fn score(
        &self,
        technical: &TechnicalIndicators,
        risk: &RiskMetrics,
        liquidity: &LiquidityMetrics,
    ) -> Result<TradingSignal, IndicatorError> {
        let w = &self.weights;

        let rsi = finite(technical.rsi, "rsi")?;
        let histogram = finite(technical.macd_histogram, "macd_histogram")?;
        let var = finite(risk.value_at_risk, "value_at_risk")?;
        let depth = finite(liquidity.depth_2_percent, "depth_2_percent")?;

        // Oversold is bullish, overbought bearish
        let rsi_score = if rsi < w.rsi_oversold {
            w.rsi_weight
        } else if rsi > w.rsi_overbought {
            -w.rsi_weight
        } else {
            0.0
        };

        let macd_score = if histogram > 0.0 {
            w.macd_weight
        } else {
            -w.macd_weight
        };

        // VaR enters as a loss magnitude
        let risk_score = w.risk_weight * (1.0 - (var.abs() / w.var_cap).min(1.0));
        let liquidity_score = w.liquidity_weight * (depth.max(0.0) / w.depth_target).min(1.0);

        let signal_strength = finite(
            rsi_score + macd_score + risk_score + liquidity_score,
            "signal_strength",
        )?;

        let action = if signal_strength > w.buy_threshold {
            Action::Buy
        } else if signal_strength < w.sell_threshold {
            Action::Sell
        } else {
            Action::Hold
        };

        let component_scores: BTreeMap<String, f64> = [
            ("rsi_score", rsi_score),
            ("macd_score", macd_score),
            ("risk_score", risk_score),
            ("liquidity_score", liquidity_score),
        ]
        .into_iter()
        .map(|(name, score)| (name.to_string(), score))
        .collect();

        Ok(TradingSignal {
            action,
            confidence: signal_strength.abs().min(1.0),
            signal_strength,
            component_scores,
        })
    }
}

fn finite(value: f64, name: &str) -> Result<f64, IndicatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IndicatorError::NonFinite(format!("{name} is {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technical(rsi: f64, macd_histogram: f64) -> TechnicalIndicators {
        TechnicalIndicators {
            rsi,
            macd_histogram,
            ..Default::default()
        }
    }

    fn risk(value_at_risk: f64) -> RiskMetrics {
        RiskMetrics {
            value_at_risk,
            ..Default::default()
        }
    }

    fn liquidity(depth_2_percent: f64) -> LiquidityMetrics {
        LiquidityMetrics {
            depth_2_percent,
            ..Default::default()
        }
    }

    /// Weights where only the risk and liquidity terms count.
    fn no_macd() -> SignalEngine {
        SignalEngine::new(SignalWeights {
            macd_weight: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_strong_buy() {
        let engine = SignalEngine::default();
        let signal = engine.evaluate(&technical(25.0, 0.5), &risk(-0.02), &liquidity(200_000.0));

        // 0.4 + 0.2 + 0.3 * 0.8 + 0.3
        assert_eq!(signal.action, Action::Buy);
        assert!((signal.signal_strength - 1.14).abs() < 1e-9);
        assert_eq!(signal.confidence, 1.0);
        assert!((signal.component("risk_score") - 0.24).abs() < 1e-9);
        assert!((signal.component("liquidity_score") - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_strong_sell() {
        let engine = SignalEngine::default();
        let signal = engine.evaluate(&technical(80.0, -0.5), &risk(-0.2), &liquidity(0.0));

        // -0.4 - 0.2 + 0 + 0
        assert_eq!(signal.action, Action::Sell);
        assert!((signal.signal_strength + 0.6).abs() < 1e-9);
        assert!((signal.confidence - 0.6).abs() < 1e-9);
        assert_eq!(signal.component("rsi_score"), -0.4);
        assert_eq!(signal.component("macd_score"), -0.2);
    }

    #[test]
    fn test_var_sign_is_ignored() {
        let engine = SignalEngine::default();
        let losses = engine.evaluate(&technical(50.0, 1.0), &risk(-0.05), &liquidity(0.0));
        let gains = engine.evaluate(&technical(50.0, 1.0), &risk(0.05), &liquidity(0.0));

        assert_eq!(losses, gains);
        assert!((losses.component("risk_score") - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_buy_boundary_is_strict() {
        let engine = no_macd();

        // Exactly 0.3 from the risk term alone
        let at = engine.evaluate(&technical(50.0, 0.0), &risk(0.0), &liquidity(0.0));
        assert_eq!(at.signal_strength, 0.3);
        assert_eq!(at.action, Action::Hold);

        let above = engine.evaluate(&technical(50.0, 0.0), &risk(0.0), &liquidity(1.0));
        assert!(above.signal_strength > 0.3);
        assert_eq!(above.action, Action::Buy);

        let below = engine.evaluate(&technical(50.0, 0.0), &risk(1e-6), &liquidity(0.0));
        assert!(below.signal_strength < 0.3);
        assert_eq!(below.action, Action::Hold);
    }

    #[test]
    fn test_sell_boundary_is_strict() {
        // Only the RSI term counts, at exactly -0.3
        let weights = |rsi_weight| SignalWeights {
            rsi_weight,
            macd_weight: 0.0,
            risk_weight: 0.0,
            liquidity_weight: 0.0,
            ..Default::default()
        };
        let overbought = technical(90.0, 0.0);

        let at = SignalEngine::new(weights(0.3)).evaluate(&overbought, &risk(0.0), &liquidity(0.0));
        assert_eq!(at.signal_strength, -0.3);
        assert_eq!(at.action, Action::Hold);

        let beyond =
            SignalEngine::new(weights(0.3 + 1e-9)).evaluate(&overbought, &risk(0.0), &liquidity(0.0));
        assert_eq!(beyond.action, Action::Sell);

        let within =
            SignalEngine::new(weights(0.3 - 1e-9)).evaluate(&overbought, &risk(0.0), &liquidity(0.0));
        assert_eq!(within.action, Action::Hold);
    }

    #[test]
    fn test_action_matches_strength() {
        let engine = SignalEngine::default();
        for rsi in [10.0, 50.0, 90.0] {
            for histogram in [-1.0, 0.0, 1.0] {
                for var in [0.0, -0.05, -0.5] {
                    for depth in [0.0, 50_000.0, 1e6] {
                        let signal =
                            engine.evaluate(&technical(rsi, histogram), &risk(var), &liquidity(depth));
                        let s = signal.signal_strength;
                        assert_eq!(signal.action == Action::Buy, s > 0.3);
                        assert_eq!(signal.action == Action::Sell, s < -0.3);
                        assert!((0.0..=1.0).contains(&signal.confidence));
                    }
                }
            }
        }
    }

    #[test]
    fn test_evaluate_is_pure() {
        let engine = SignalEngine::default();
        let inputs = (technical(28.0, 0.1), risk(-0.03), liquidity(40_000.0));

        let first = engine.evaluate(&inputs.0, &inputs.1, &inputs.2);
        let second = engine.evaluate(&inputs.0, &inputs.1, &inputs.2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_finite_input_is_neutral() {
        let engine = SignalEngine::default();

        let signal = engine.evaluate(&technical(f64::NAN, 1.0), &risk(0.0), &liquidity(0.0));
        assert_eq!(signal, TradingSignal::neutral());

        let signal = engine.evaluate(&technical(50.0, 1.0), &risk(f64::NEG_INFINITY), &liquidity(0.0));
        assert_eq!(signal, TradingSignal::neutral());

        assert!(matches!(
            engine.score(&technical(50.0, 1.0), &risk(0.0), &liquidity(f64::INFINITY)),
            Err(IndicatorError::NonFinite(_))
        ));
    }

    #[test]
    fn test_negative_depth_scores_zero() {
        let signal = SignalEngine::default().evaluate(&technical(50.0, 1.0), &risk(0.0), &liquidity(-5.0));
        assert_eq!(signal.component("liquidity_score"), 0.0);
    }

    #[test]
    fn test_weights_validation() {
        assert!(SignalWeights::default().validate().is_ok());

        let negative = SignalWeights {
            macd_weight: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let inverted = SignalWeights {
            rsi_oversold: 80.0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let no_cap = SignalWeights {
            var_cap: 0.0,
            ..Default::default()
        };
        assert!(no_cap.validate().is_err());
    }
}
