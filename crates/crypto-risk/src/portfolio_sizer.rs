//! Confidence-scaled trade sizing.

use crypto_core::error::RiskError;
use crypto_core::traits::PriceLookup;
use crypto_core::types::{
    Action, Fill, PortfolioState, Side, TokenMetrics, TradeProposal, TradingSignal,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::sizing_limits::SizingConfig;

/// Sizes trades and owns the portfolio they are applied to.
#[derive(Debug, Clone)]
pub struct PortfolioSizer {
    portfolio: PortfolioState,
    config: SizingConfig,
}

impl PortfolioSizer {
    /// Create a new sizer over an existing portfolio.
    pub fn new(portfolio: PortfolioState, config: SizingConfig) -> Self {
        Self { portfolio, config }
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Trade size in quote currency for a signal.
    ///
    /// Starts from `max_position_pct` of total value scaled by confidence,
    /// then caps at `max_liquidity_pct` of liquidity when liquidity is known,
    /// then at available cash. The cash cap applies to sells as well. Never
    /// negative. Errored metrics skip the liquidity cap.
    pub fn size_trade(&self, signal: &TradingSignal, metrics: &TokenMetrics) -> Decimal {
        let Some(confidence) = to_decimal(signal.confidence) else {
            warn!("Cannot size trade with confidence {}", signal.confidence);
            return Decimal::ZERO;
        };

        let max_position = self.portfolio.total_value() * self.config.max_position_pct;
        let mut size = max_position * confidence;

        let metrics = metrics.effective();
        if metrics.liquidity > 0.0 {
            match to_decimal(metrics.liquidity) {
                Some(liquidity) => size = size.min(liquidity * self.config.max_liquidity_pct),
                None => warn!("Skipping liquidity cap for liquidity {}", metrics.liquidity),
            }
        }

        size = size.min(self.portfolio.cash());
        size.max(Decimal::ZERO)
    }

    /// Turn a signal into a sized trade, if it calls for one.
    ///
    /// Returns `None` for HOLD, a zero size or an unusable price.
    pub fn propose_trade(
        &self,
        token: &str,
        signal: &TradingSignal,
        metrics: &TokenMetrics,
    ) -> Option<TradeProposal> {
        let side = match signal.action {
            Action::Buy => Side::Buy,
            Action::Sell => Side::Sell,
            Action::Hold => return None,
        };

        let notional = self.size_trade(signal, metrics);
        if notional <= Decimal::ZERO {
            debug!("No size available for {} {}", side, token);
            return None;
        }

        let price = to_decimal(metrics.effective().price).filter(|p| *p > Decimal::ZERO)?;
        let quantity = notional.checked_div(price)?;

        Some(TradeProposal {
            token: token.to_string(),
            side,
            notional,
            quantity,
            reference_price: price,
            confidence: signal.confidence,
        })
    }

    /// Apply a confirmed execution and revalue the portfolio.
    ///
    /// A buy costing more than available cash is reduced to what cash
    /// affords. Returns the fill as applied. Zero or negative quantity and
    /// negative price are rejected with the portfolio untouched.
    pub fn apply<P>(&mut self, fill: &Fill, prices: &P) -> Result<Fill, RiskError>
    where
        P: PriceLookup + ?Sized,
    {
        if fill.quantity <= Decimal::ZERO {
            return Err(RiskError::InvalidFill(format!(
                "quantity must be positive, got {}",
                fill.quantity
            )));
        }
        if fill.price < Decimal::ZERO {
            return Err(RiskError::InvalidFill(format!(
                "price must not be negative, got {}",
                fill.price
            )));
        }
        let cost = fill
            .quantity
            .checked_mul(fill.price)
            .ok_or_else(|| RiskError::InvalidFill("fill value overflows".into()))?;

        let mut applied = fill.clone();
        let cash = self.portfolio.cash();
        if fill.side == Side::Buy && cost > cash {
            let affordable = if fill.price > Decimal::ZERO {
                (cash / fill.price).max(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            warn!(
                "Clamping {} buy from {} to {} units: cost {} exceeds cash {}",
                fill.token, fill.quantity, affordable, cost, cash
            );
            applied.quantity = affordable;
        }

        self.portfolio.apply_fill(&applied);
        let total = self.portfolio.revalue(prices);
        debug!(
            "Applied {} {} {} @ {}, portfolio value {}",
            applied.side, applied.quantity, applied.token, applied.price, total
        );

        Ok(applied)
    }

    /// Revalue the portfolio at current prices.
    pub fn revalue<P>(&mut self, prices: &P) -> Decimal
    where
        P: PriceLookup + ?Sized,
    {
        self.portfolio.revalue(prices)
    }
}

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::try_from(value).ok()
}
