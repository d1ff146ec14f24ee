//! Trade sizing and portfolio accounting.
//!
//! Sizes trades from signal confidence under position, liquidity and cash
//! limits, and applies confirmed fills to the owned portfolio.

mod portfolio_sizer;
mod sizing_limits;

pub use portfolio_sizer::PortfolioSizer;
pub use sizing_limits::SizingConfig;
