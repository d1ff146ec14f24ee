//! Risk statistics over return and price series.

use crypto_core::error::IndicatorError;
use crypto_core::traits::{validate_series, Statistic};
use crypto_core::types::TokenMetrics;
use statrs::statistics::Statistics;

use crate::{ensure_finite, or_neutral, MIN_STD_DEV, TRADING_DAYS};

/// Historical Value-at-Risk.
///
/// The `(1 - confidence)` quantile of the return distribution, using linear
/// interpolation between order statistics. Losses come out negative.
#[derive(Debug, Clone)]
pub struct ValueAtRisk {
    confidence: f64,
}

impl ValueAtRisk {
    /// Create a VaR statistic at the given confidence level (e.g. 0.95).
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }
}

impl Default for ValueAtRisk {
    fn default() -> Self {
        Self::new(0.95)
    }
}

impl Statistic for ValueAtRisk {
    fn compute(&self, returns: &[f64]) -> Result<f64, IndicatorError> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "VaR confidence must be in (0, 1), got {}",
                self.confidence
            )));
        }
        validate_series(returns, self.min_len())?;

        let mut sorted = returns.to_vec();
        sorted.sort_by(f64::total_cmp);
        ensure_finite(quantile(&sorted, 1.0 - self.confidence), "VaR")
    }

    fn min_len(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "VaR"
    }
}

/// Linear-interpolation quantile of non-empty sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}

/// Annualized Sharpe ratio of a return series.
#[derive(Debug, Clone)]
pub struct SharpeRatio {
    risk_free_rate: f64,
}

impl SharpeRatio {
    /// Create a Sharpe ratio statistic against an annual risk-free rate.
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }
}

impl Statistic for SharpeRatio {
    fn compute(&self, returns: &[f64]) -> Result<f64, IndicatorError> {
        if !self.risk_free_rate.is_finite() {
            return Err(IndicatorError::InvalidParameter(
                "risk-free rate must be finite".into(),
            ));
        }
        validate_series(returns, self.min_len())?;

        let std_dev = returns.iter().std_dev();
        // Constant returns leave rounding noise rather than an exact zero
        if std_dev < MIN_STD_DEV {
            return Err(IndicatorError::Degenerate("zero return variance".into()));
        }

        let daily_rf = self.risk_free_rate / TRADING_DAYS;
        let excess_mean = returns.iter().map(|r| r - daily_rf).mean();
        ensure_finite(TRADING_DAYS.sqrt() * excess_mean / std_dev, "Sharpe ratio")
    }

    fn min_len(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "Sharpe"
    }
}

/// Largest peak-to-trough decline of a price series, as a non-positive fraction.
#[derive(Debug, Clone, Default)]
pub struct MaxDrawdown;

impl Statistic for MaxDrawdown {
    fn compute(&self, prices: &[f64]) -> Result<f64, IndicatorError> {
        validate_series(prices, self.min_len())?;

        let mut running_max = f64::NEG_INFINITY;
        let mut worst = 0.0_f64;
        for &price in prices {
            running_max = running_max.max(price);
            // A zero peak has no defined drawdown
            if running_max > 0.0 {
                worst = worst.min((price - running_max) / running_max);
            }
        }
        ensure_finite(worst, "max drawdown")
    }

    fn min_len(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MaxDrawdown"
    }
}

/// Value-at-Risk of `returns`, 0.0 when it cannot be computed.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    or_neutral("value_at_risk", ValueAtRisk::new(confidence).compute(returns), 0.0)
}

/// Sharpe ratio of `returns`, 0.0 when it cannot be computed.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    or_neutral(
        "sharpe_ratio",
        SharpeRatio::new(risk_free_rate).compute(returns),
        0.0,
    )
}

/// Maximum drawdown of `prices`, 0.0 when it cannot be computed.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    or_neutral("max_drawdown", MaxDrawdown.compute(prices), 0.0)
}

/// Liquidity relative to volume, capped at 1.0.
///
/// 1.0 (worst case) when volume is zero or the metrics are unavailable.
pub fn liquidity_risk(metrics: &TokenMetrics) -> f64 {
    let metrics = metrics.effective();
    let result = if metrics.volume > 0.0 {
        ensure_finite(metrics.liquidity / metrics.volume, "liquidity risk").map(|r| r.min(1.0))
    } else {
        Err(IndicatorError::Degenerate("no traded volume".into()))
    };
    or_neutral("liquidity_risk", result, 1.0)
}
