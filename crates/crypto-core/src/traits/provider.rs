//! Market data collaborator traits.

use crate::error::DataError;
use crate::types::{MarketDepth, PriceSeries, TokenMetrics};
use async_trait::async_trait;

/// Source of point-in-time token metrics and price history.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Fetch current metrics for a token.
    async fn get_metrics(&self, token: &str) -> Result<TokenMetrics, DataError>;

    /// Fetch price history for a token.
    ///
    /// # Arguments
    /// * `token` - The token to fetch
    /// * `lookback` - Maximum number of points, most recent last
    async fn get_history(&self, token: &str, lookback: usize) -> Result<PriceSeries, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// Source of market depth quotes.
#[async_trait]
pub trait LiquidityProvider: Send + Sync {
    /// Fetch depth quotes keyed by trade size.
    async fn get_depth(&self, token: &str) -> Result<MarketDepth, DataError>;

    /// Get the provider name.
    fn name(&self) -> &str;
}
