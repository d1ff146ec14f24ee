//! Size command implementation.

use anyhow::{Context, Result};
use crypto_config::AppConfig;
use crypto_core::types::{PortfolioState, TradeProposal};
use crypto_monitor::{analysis_summary, sizing_summary};
use crypto_risk::PortfolioSizer;
use crypto_signals::MarketAnalysis;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::market::{self, MemoryJournal};
use crate::cli::SizeArgs;

#[derive(Serialize)]
struct SizeReport<'a> {
    analysis: &'a MarketAnalysis,
    portfolio: &'a PortfolioState,
    size: Decimal,
    proposal: Option<&'a TradeProposal>,
}

pub async fn run(args: SizeArgs, config: &AppConfig) -> Result<()> {
    let capital = match args.capital {
        Some(capital) => Decimal::try_from(capital).context("Invalid --capital")?,
        None => config.portfolio.initial_capital,
    };
    if capital <= Decimal::ZERO {
        anyhow::bail!("Capital must be positive, got {}", capital);
    }

    let (token, data) = market::load(&args.market)?;
    let analysis = market::analyze(config, &token, &data).await;

    let sizer = PortfolioSizer::new(PortfolioState::new(capital), config.sizing.clone());
    let size = sizer.size_trade(&analysis.signal, data.metrics());
    let proposal = sizer.propose_trade(&token, &analysis.signal, data.metrics());
    info!("Sized {} {} at {}", analysis.signal.action, token, size);

    let mut journal = MemoryJournal::open(args.market.memory.as_deref())?;
    let mut store = journal.replay(&config.memory)?;
    journal.record(&mut store, market::analysis_memory(&analysis))?;

    match args.market.output.as_str() {
        "json" => {
            let report = SizeReport {
                analysis: &analysis,
                portfolio: sizer.portfolio(),
                size,
                proposal: proposal.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{}", analysis_summary(&analysis));
            println!(
                "{}",
                sizing_summary(sizer.portfolio(), size, proposal.as_ref())
            );
        }
    }

    journal.save(config.memory.max_size)?;
    Ok(())
}
