//! Typed inputs to the signal engine.
//!
//! Every field defaults to the value the engine assumes when the input is
//! missing, so a partially populated input scores the same as an absent one.

use crypto_core::types::MarketDepth;
use serde::{Deserialize, Serialize};

/// Price impact treated as "within 2%" when deriving depth.
pub const DEPTH_IMPACT_LIMIT: f64 = 0.02;

/// Technical indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub bollinger_position: f64,
    pub momentum: f64,
    pub volatility: f64,
}

impl Default for TechnicalIndicators {
    fn default() -> Self {
        Self {
            rsi: 50.0,
            macd_histogram: 0.0,
            bollinger_position: 0.5,
            momentum: 0.0,
            volatility: 0.0,
        }
    }
}

/// Risk statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskMetrics {
    /// Return quantile at the configured confidence (negative for losses)
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    /// 1.0 is the least liquid
    pub liquidity_risk: f64,
}

impl Default for RiskMetrics {
    fn default() -> Self {
        Self {
            value_at_risk: 0.0,
            sharpe_ratio: 0.0,
            volatility: 0.0,
            max_drawdown: 0.0,
            liquidity_risk: 1.0,
        }
    }
}

/// Liquidity snapshot derived from market depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityMetrics {
    /// Largest trade size that moves the price by at most 2%
    pub depth_2_percent: f64,
    /// Price impact quoted for the largest size
    pub slippage_impact: f64,
    pub maker_volume: f64,
    pub taker_volume: f64,
}

impl LiquidityMetrics {
    /// Derive liquidity metrics from depth quotes.
    ///
    /// Maker and taker volumes are not observable through quotes and stay 0.
    pub fn from_depth(depth: &MarketDepth) -> Self {
        let depth_2_percent = depth
            .iter()
            .filter(|(_, quote)| {
                quote.price_impact.is_finite() && quote.price_impact.abs() <= DEPTH_IMPACT_LIMIT
            })
            .map(|(&size, _)| size)
            .max()
            .unwrap_or(0);

        let slippage_impact = depth
            .last_key_value()
            .map(|(_, quote)| quote.price_impact)
            .filter(|impact| impact.is_finite())
            .unwrap_or(0.0);

        Self {
            depth_2_percent: depth_2_percent as f64,
            slippage_impact,
            maker_volume: 0.0,
            taker_volume: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_core::types::DepthQuote;

    fn quote(price_impact: f64) -> DepthQuote {
        DepthQuote {
            price: 1.0,
            price_impact,
        }
    }

    #[test]
    fn test_defaults_are_neutral() {
        let technical = TechnicalIndicators::default();
        assert_eq!(technical.rsi, 50.0);
        assert_eq!(technical.bollinger_position, 0.5);
        assert_eq!(RiskMetrics::default().liquidity_risk, 1.0);
        assert_eq!(LiquidityMetrics::default().depth_2_percent, 0.0);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let technical: TechnicalIndicators = serde_json::from_str(r#"{"macd_histogram": 1.5}"#).unwrap();
        assert_eq!(technical.rsi, 50.0);
        assert_eq!(technical.macd_histogram, 1.5);

        let risk: RiskMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(risk, RiskMetrics::default());
    }

    #[test]
    fn test_from_depth() {
        let depth: MarketDepth = [
            (1_000, quote(0.001)),
            (10_000, quote(0.008)),
            (50_000, quote(0.02)),
            (100_000, quote(0.045)),
        ]
        .into_iter()
        .collect();

        let liquidity = LiquidityMetrics::from_depth(&depth);
        assert_eq!(liquidity.depth_2_percent, 50_000.0);
        assert_eq!(liquidity.slippage_impact, 0.045);
        assert_eq!(liquidity.maker_volume, 0.0);
    }

    #[test]
    fn test_from_depth_ignores_bad_quotes() {
        let depth: MarketDepth = [(500, quote(f64::NAN)), (800, quote(0.5))].into_iter().collect();

        let liquidity = LiquidityMetrics::from_depth(&depth);
        assert_eq!(liquidity.depth_2_percent, 0.0);
        assert_eq!(liquidity.slippage_impact, 0.5);
        assert_eq!(
            LiquidityMetrics::from_depth(&MarketDepth::new()),
            LiquidityMetrics::default()
        );
    }
}
