//! Sizing limits configuration.

use crypto_core::error::RiskError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Limits applied when sizing a trade, as fractions of the reference amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Maximum trade size as a fraction of total portfolio value
    pub max_position_pct: Decimal,
    /// Maximum trade size as a fraction of the token's liquidity
    pub max_liquidity_pct: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            max_position_pct: dec!(0.20),
            max_liquidity_pct: dec!(0.10),
        }
    }
}

impl SizingConfig {
    /// Both fractions must lie in (0, 1].
    pub fn validate(&self) -> Result<(), RiskError> {
        for (name, value) in [
            ("max_position_pct", self.max_position_pct),
            ("max_liquidity_pct", self.max_liquidity_pct),
        ] {
            if value <= Decimal::ZERO || value > Decimal::ONE {
                return Err(RiskError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
