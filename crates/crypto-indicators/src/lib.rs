//! Technical indicators and risk statistics with SIMD optimization.
//!
//! This crate provides the indicator library used by the signal engine:
//! - Moving averages (SMA, first-value seeded EMA)
//! - Momentum indicators (RSI, MACD, momentum, price change)
//! - Volatility indicators (Bollinger Bands, annualized volatility)
//! - Risk statistics (Value-at-Risk, Sharpe ratio, max drawdown, liquidity risk)
//!
//! Every indicator is available as a struct implementing the core
//! [`Indicator`](crypto_core::Indicator) family of traits, which reports
//! failures as [`IndicatorError`]. The free functions (`rsi`, `macd`, ...)
//! wrap those and always return a finite value, falling back to the
//! indicator's neutral default.

pub mod momentum;
pub mod moving_average;
pub mod risk;
pub mod simd;
pub mod volatility;

pub use momentum::{macd, momentum, price_change_pct, rsi, Macd, MacdOutput, Momentum, Rsi};
pub use moving_average::{Ema, Sma};
pub use risk::{
    liquidity_risk, max_drawdown, sharpe_ratio, value_at_risk, MaxDrawdown, SharpeRatio,
    ValueAtRisk,
};
pub use volatility::{
    bollinger_position, volatility, BollingerBands, BollingerOutput, Volatility,
};

use crypto_core::error::IndicatorError;
use tracing::{debug, warn};

/// Periods per year used to annualize daily statistics.
pub const TRADING_DAYS: f64 = 252.0;

/// Standard deviations below this (relative to the series scale) are treated as zero variance.
pub(crate) const MIN_STD_DEV: f64 = 1e-12;

/// Reject a non-finite result.
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64, IndicatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IndicatorError::NonFinite(format!("{what} evaluated to {value}")))
    }
}

/// Resolve an indicator result to a usable value.
///
/// Expected degradations are logged at debug, faults at warn; both yield `neutral`.
pub(crate) fn or_neutral<T>(name: &str, result: Result<T, IndicatorError>, neutral: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.is_neutral() => {
            debug!("{} using neutral value: {}", name, e);
            neutral
        }
        Err(e) => {
            warn!("{} fault, using neutral value: {}", name, e);
            neutral
        }
    }
}
