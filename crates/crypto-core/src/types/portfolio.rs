//! Portfolio state and trade types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::traits::PriceLookup;

/// Trade side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Get the sign for position calculations (+1 for buy, -1 for sell).
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A confirmed execution reported by the execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub token: String,
    pub side: Side,
    /// Filled quantity in token units
    pub quantity: Decimal,
    /// Fill price in quote currency
    pub price: Decimal,
}

impl Fill {
    /// Create a new fill.
    pub fn new(token: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            token: token.into(),
            side,
            quantity,
            price,
        }
    }

    /// Quote-currency value of the fill.
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }
}

/// A sized trade ready to hand to an execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub token: String,
    pub side: Side,
    /// Size in quote currency
    pub notional: Decimal,
    /// Size in token units at the reference price
    pub quantity: Decimal,
    /// Reference price used for the conversion
    pub reference_price: Decimal,
    /// Confidence of the signal behind the trade
    pub confidence: f64,
}

/// Cash, holdings and their valuation.
///
/// `total_value` is only ever derived by [`PortfolioState::revalue`]; there is
/// no setter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    cash: Decimal,
    positions: BTreeMap<String, Decimal>,
    total_value: Decimal,
}

impl PortfolioState {
    /// Create a portfolio holding only cash.
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            positions: BTreeMap::new(),
            total_value: initial_cash,
        }
    }

    /// Create a portfolio with existing holdings, valued at `prices`.
    pub fn with_holdings<P>(
        cash: Decimal,
        positions: impl IntoIterator<Item = (String, Decimal)>,
        prices: &P,
    ) -> Self
    where
        P: PriceLookup + ?Sized,
    {
        let mut portfolio = Self {
            cash,
            positions: positions.into_iter().collect(),
            total_value: cash,
        };
        portfolio.revalue(prices);
        portfolio
    }

    /// Available cash.
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    /// Map of token to held quantity (negative for short).
    pub fn positions(&self) -> &BTreeMap<String, Decimal> {
        &self.positions
    }

    /// Held quantity of a token, zero when absent.
    pub fn position(&self, token: &str) -> Decimal {
        self.positions.get(token).copied().unwrap_or(Decimal::ZERO)
    }

    /// Value of cash plus holdings as of the last revaluation.
    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    /// Get the number of open positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Move cash and holdings for a fill. Does not revalue.
    ///
    /// Sells are not floored at zero; short positions are representable.
    pub fn apply_fill(&mut self, fill: &Fill) {
        let value = fill.notional();
        match fill.side {
            Side::Buy => self.cash -= value,
            Side::Sell => self.cash += value,
        }

        let position = self
            .positions
            .entry(fill.token.clone())
            .or_insert(Decimal::ZERO);
        *position += fill.side.sign() * fill.quantity;

        // Remove flat positions
        if position.is_zero() {
            self.positions.remove(&fill.token);
        }
    }

    /// Recompute `total_value` as cash plus every holding at its current price.
    ///
    /// A token whose price cannot be looked up, or whose value overflows, is
    /// left out of this cycle's sum.
    pub fn revalue<P>(&mut self, prices: &P) -> Decimal
    where
        P: PriceLookup + ?Sized,
    {
        let mut total = self.cash;
        for (token, quantity) in &self.positions {
            let price = match prices.price(token) {
                Ok(price) => price,
                Err(e) => {
                    warn!("Omitting {} from valuation: {}", token, e);
                    continue;
                }
            };
            match quantity.checked_mul(price).and_then(|v| total.checked_add(v)) {
                Some(sum) => total = sum,
                None => warn!(
                    "Omitting {} from valuation: {} x {} overflows",
                    token, quantity, price
                ),
            }
        }
        self.total_value = total;
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn prices(entries: &[(&str, Decimal)]) -> HashMap<String, Decimal> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_portfolio_creation() {
        let portfolio = PortfolioState::new(dec!(1000));
        assert_eq!(portfolio.cash(), dec!(1000));
        assert_eq!(portfolio.total_value(), dec!(1000));
        assert_eq!(portfolio.position_count(), 0);
    }

    #[test]
    fn test_revalue_skips_overflowing_holding() {
        let mut portfolio = PortfolioState::new(dec!(1000));
        portfolio.apply_fill(&Fill::new("SOL", Side::Buy, dec!(100), dec!(1)));
        portfolio.apply_fill(&Fill::new("JUP", Side::Buy, dec!(10), dec!(2)));

        let total = portfolio.revalue(&prices(&[("SOL", Decimal::MAX), ("JUP", dec!(3))]));
        assert_eq!(total, dec!(910));
        assert_eq!(portfolio.total_value(), dec!(910));
    }

    #[test]
    fn test_apply_buy_and_sell() {
        let mut portfolio = PortfolioState::new(dec!(1000));

        portfolio.apply_fill(&Fill::new("SOL", Side::Buy, dec!(2), dec!(100)));
        assert_eq!(portfolio.cash(), dec!(800));
        assert_eq!(portfolio.position("SOL"), dec!(2));

        portfolio.apply_fill(&Fill::new("SOL", Side::Sell, dec!(2), dec!(110)));
        assert_eq!(portfolio.cash(), dec!(1020));
        assert_eq!(portfolio.position("SOL"), Decimal::ZERO);
        assert_eq!(portfolio.position_count(), 0);
    }

    #[test]
    fn test_sell_can_go_short() {
        let mut portfolio = PortfolioState::new(dec!(100));
        portfolio.apply_fill(&Fill::new("BONK", Side::Sell, dec!(5), dec!(2)));

        assert_eq!(portfolio.position("BONK"), dec!(-5));
        assert_eq!(portfolio.cash(), dec!(110));
    }

    #[test]
    fn test_revalue() {
        let mut portfolio = PortfolioState::new(dec!(1000));
        portfolio.apply_fill(&Fill::new("SOL", Side::Buy, dec!(2), dec!(100)));

        let total = portfolio.revalue(&prices(&[("SOL", dec!(150))]));
        assert_eq!(total, dec!(1100));
        assert_eq!(portfolio.total_value(), dec!(1100));
    }

    #[test]
    fn test_revalue_omits_missing_price() {
        let portfolio = PortfolioState::with_holdings(
            dec!(100),
            [("SOL".to_string(), dec!(1)), ("JUP".to_string(), dec!(10))],
            &prices(&[("SOL", dec!(50))]),
        );

        assert_eq!(portfolio.total_value(), dec!(150));
    }
}
