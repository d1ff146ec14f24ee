//! Current price lookup used for portfolio valuation.

use crate::error::DataError;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Synchronous source of current token prices.
pub trait PriceLookup {
    /// Current price of a token in quote currency.
    fn price(&self, token: &str) -> Result<Decimal, DataError>;
}

impl PriceLookup for HashMap<String, Decimal> {
    fn price(&self, token: &str) -> Result<Decimal, DataError> {
        self.get(token)
            .copied()
            .ok_or_else(|| DataError::PriceUnavailable(token.to_string()))
    }
}

impl PriceLookup for BTreeMap<String, Decimal> {
    fn price(&self, token: &str) -> Result<Decimal, DataError> {
        self.get(token)
            .copied()
            .ok_or_else(|| DataError::PriceUnavailable(token.to_string()))
    }
}
