//! Core data types for the signal engine.

mod metrics;
mod portfolio;
mod price;
mod signal;

pub use metrics::{DepthQuote, MarketDepth, TokenMetrics};
pub use portfolio::{Fill, PortfolioState, Side, TradeProposal};
pub use price::{PricePoint, PriceSeries};
pub use signal::{Action, TradingSignal};
