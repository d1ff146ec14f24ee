//! Core types and traits for the crypto signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceSeries, TokenMetrics, MarketDepth)
//! - Trading signals and portfolio state
//! - Collaborator traits for market data, liquidity, execution and pricing
//! - The error taxonomy shared by every engine crate

pub mod error;
pub mod traits;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use traits::*;
pub use types::*;
