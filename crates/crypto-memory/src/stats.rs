//! Trade performance aggregation.

use serde::{Deserialize, Serialize};

use crate::entry::TradeMemory;

/// Exact running counters over every recorded trade.
///
/// Win rate and average profit are both derived from the same population:
/// a trade without a recorded profit counts as a non-win with zero profit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    total_trades: u64,
    winning_trades: u64,
    profit_sum: f64,
}

impl TradeStats {
    /// Record a trade.
    pub fn record(&mut self, trade: &TradeMemory) {
        let profit = trade.profit.unwrap_or(0.0);
        self.total_trades += 1;
        if profit > 0.0 {
            self.winning_trades += 1;
        }
        self.profit_sum += profit;
    }

    /// Derived metrics.
    pub fn metrics(&self) -> PerformanceMetrics {
        let (win_rate, avg_profit) = if self.total_trades == 0 {
            (0.0, 0.0)
        } else {
            let total = self.total_trades as f64;
            (self.winning_trades as f64 / total, self.profit_sum / total)
        };

        PerformanceMetrics {
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            win_rate,
            avg_profit,
            total_profit: self.profit_sum,
        }
    }
}

/// Snapshot of trading performance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_trades: u64,
    pub winning_trades: u64,
    /// Fraction of trades with positive profit
    pub win_rate: f64,
    pub avg_profit: f64,
    pub total_profit: f64,
}
