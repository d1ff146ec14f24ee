//! Plain-text reports for analyses, memory and sizing.

use crypto_core::types::{PortfolioState, TradeProposal};
use crypto_memory::{MemoryEntry, MemoryPayload, PerformanceMetrics};
use crypto_signals::MarketAnalysis;
use rust_decimal::Decimal;

const RULE: &str = "───────────────────────────────────────────────────────────\n";
const BANNER: &str = "═══════════════════════════════════════════════════════════\n";

/// Render a market analysis.
pub fn analysis_summary(analysis: &MarketAnalysis) -> String {
    let mut s = String::new();

    s.push_str(BANNER);
    s.push_str(&format!("  MARKET ANALYSIS: {}\n", analysis.token));
    s.push_str(BANNER);
    s.push('\n');

    s.push_str("MARKET\n");
    s.push_str(RULE);
    s.push_str(&format!("  Price:               {:.6}\n", analysis.price));
    s.push_str(&format!("  Volume (24h):        {:.2}\n", analysis.volume_24h));
    s.push_str(&format!("  Price Change:        {:.2}%\n", analysis.price_change_24h));
    s.push('\n');

    let tech = &analysis.technical;
    s.push_str("TECHNICAL\n");
    s.push_str(RULE);
    s.push_str(&format!("  RSI:                 {:.2}\n", tech.rsi));
    s.push_str(&format!("  MACD Histogram:      {:.6}\n", tech.macd_histogram));
    s.push_str(&format!("  Bollinger Position:  {:.3}\n", tech.bollinger_position));
    s.push_str(&format!("  Momentum:            {:.4}\n", tech.momentum));
    s.push_str(&format!("  Volatility:          {:.4}\n", tech.volatility));
    s.push('\n');

    let risk = &analysis.risk;
    s.push_str("RISK\n");
    s.push_str(RULE);
    s.push_str(&format!("  Value at Risk:       {:.4}\n", risk.value_at_risk));
    s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", risk.sharpe_ratio));
    s.push_str(&format!("  Max Drawdown:        {:.2}%\n", risk.max_drawdown * 100.0));
    s.push_str(&format!("  Liquidity Risk:      {:.3}\n", risk.liquidity_risk));
    s.push('\n');

    let liquidity = &analysis.liquidity;
    s.push_str("LIQUIDITY\n");
    s.push_str(RULE);
    s.push_str(&format!("  Depth (2%):          {:.0}\n", liquidity.depth_2_percent));
    s.push_str(&format!("  Slippage Impact:     {:.4}\n", liquidity.slippage_impact));
    s.push('\n');

    let signal = &analysis.signal;
    s.push_str("SIGNAL\n");
    s.push_str(RULE);
    s.push_str(&format!("  Action:              {}\n", signal.action));
    s.push_str(&format!("  Strength:            {:+.3}\n", signal.signal_strength));
    s.push_str(&format!("  Confidence:          {:.3}\n", signal.confidence));
    for (name, score) in &signal.component_scores {
        s.push_str(&format!("    {:<18} {:+.3}\n", name, score));
    }

    s
}

/// Render recalled memories and trade performance.
pub fn memory_summary(recalled: &[&MemoryEntry], performance: &PerformanceMetrics) -> String {
    let mut s = String::new();

    s.push_str("MEMORY\n");
    s.push_str(RULE);
    if recalled.is_empty() {
        s.push_str("  No relevant memories\n");
    }
    for entry in recalled {
        s.push_str(&format!(
            "  [{}] {:<9} {:<8} importance {:.2}  {}\n",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.kind(),
            entry.token().unwrap_or("-"),
            entry.importance,
            describe(&entry.payload)
        ));
    }
    s.push('\n');

    s.push_str("PERFORMANCE\n");
    s.push_str(RULE);
    s.push_str(&format!("  Total Trades:        {}\n", performance.total_trades));
    s.push_str(&format!("  Win Rate:            {:.1}%\n", performance.win_rate * 100.0));
    s.push_str(&format!("  Avg Profit:          {:.2}\n", performance.avg_profit));

    s
}

/// Render a sizing decision against the portfolio it was made for.
pub fn sizing_summary(
    portfolio: &PortfolioState,
    size: Decimal,
    proposal: Option<&TradeProposal>,
) -> String {
    let mut s = String::new();

    s.push_str("SIZING\n");
    s.push_str(RULE);
    s.push_str(&format!("  Portfolio Value:     ${:.2}\n", portfolio.total_value()));
    s.push_str(&format!("  Cash:                ${:.2}\n", portfolio.cash()));
    s.push_str(&format!("  Trade Size:          ${:.2}\n", size));
    match proposal {
        Some(p) => s.push_str(&format!(
            "  Proposal:            {} {:.6} {} @ {}\n",
            p.side, p.quantity, p.token, p.reference_price
        )),
        None => s.push_str("  Proposal:            none\n"),
    }

    s
}

fn describe(payload: &MemoryPayload) -> String {
    match payload {
        MemoryPayload::Trade(t) => match t.profit {
            Some(profit) => format!("{} {:.2} profit {:+.2}", t.action, t.size, profit),
            None => format!("{} {:.2}", t.action, t.size),
        },
        MemoryPayload::Error(e) => e.message.clone(),
        MemoryPayload::Analysis(a) => format!(
            "{} confidence {:.2} risk {:.2}",
            a.action.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
            a.confidence,
            a.risk_score
        ),
        MemoryPayload::Note(n) => format!("{} field(s)", n.fields.len()),
    }
}
