//! Trading signal generation.
//!
//! - [`SignalEngine`] turns technical, risk and liquidity inputs into a
//!   weighted [`TradingSignal`](crypto_core::TradingSignal).
//! - [`MarketAnalyzer`] ties the indicator library and the engine together,
//!   either over data already in hand or through the market data
//!   collaborator traits.

pub mod analyzer;
pub mod engine;
pub mod inputs;

pub use analyzer::{AnalyzerConfig, MarketAnalysis, MarketAnalyzer};
pub use engine::{SignalEngine, SignalWeights};
pub use inputs::{LiquidityMetrics, RiskMetrics, TechnicalIndicators};
