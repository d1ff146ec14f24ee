//! Trade execution trait.

use crate::error::ExecutionError;
use crate::types::{Fill, TradeProposal};
use async_trait::async_trait;

/// Trait for execution integrations.
///
/// The engine only proposes trades; an executor turns a proposal into a
/// confirmed [`Fill`] which is then applied to the portfolio.
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    /// Submit a sized trade.
    ///
    /// # Returns
    /// The confirmed fill, which may differ from the proposal in quantity and price
    async fn submit(&self, proposal: &TradeProposal) -> Result<Fill, ExecutionError>;

    /// Get the executor name.
    fn name(&self) -> &str;
}
