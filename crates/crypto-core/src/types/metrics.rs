//! Point-in-time token metrics and market depth.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time market metrics for a token.
///
/// When `error` is set the numeric fields are not trustworthy; consumers read
/// through [`TokenMetrics::effective`] to get a zeroed view instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    pub price: f64,
    pub volume: f64,
    pub liquidity: f64,
    pub holders: u64,
    pub transactions: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TokenMetrics {
    /// Zeroed metrics carrying the reason they are unavailable.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Whether the metrics can be trusted.
    pub fn is_available(&self) -> bool {
        self.error.is_none()
    }

    /// The metrics as consumers should see them: zeroed when errored.
    pub fn effective(&self) -> TokenMetrics {
        if self.is_available() {
            self.clone()
        } else {
            TokenMetrics::unavailable(self.error.clone().unwrap_or_default())
        }
    }
}

/// Quote observed for one trade size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthQuote {
    /// Effective execution price
    pub price: f64,
    /// Price impact as a fraction (0.02 = 2%)
    pub price_impact: f64,
}

/// Market depth keyed by quoted trade size.
pub type MarketDepth = BTreeMap<u64, DepthQuote>;
