//! Core traits for the signal engine.

mod executor;
mod indicator;
mod price_lookup;
mod provider;

pub use executor::TradeExecutor;
pub use indicator::{validate_series, Indicator, MultiOutputIndicator, Statistic};
pub use price_lookup::PriceLookup;
pub use provider::{LiquidityProvider, MetricsProvider};
