//! Evaluate command implementation.

use anyhow::Result;
use crypto_config::AppConfig;
use crypto_memory::{MemoryContext, MemoryEntry, MemoryKind, PerformanceMetrics};
use crypto_monitor::{analysis_summary, memory_summary};
use crypto_signals::MarketAnalysis;
use serde::Serialize;
use tracing::info;

use super::market::{self, MemoryJournal};
use crate::cli::EvaluateArgs;

#[derive(Serialize)]
struct EvaluateReport<'a> {
    analysis: &'a MarketAnalysis,
    recalled: &'a [&'a MemoryEntry],
    performance: PerformanceMetrics,
}

pub async fn run(args: EvaluateArgs, config: &AppConfig) -> Result<()> {
    let (token, data) = market::load(&args.market)?;
    info!("Evaluating {}", token);

    let analysis = market::analyze(config, &token, &data).await;
    info!(
        "{} signal for {}: strength {:.3}, confidence {:.3}",
        analysis.signal.action, token, analysis.signal.signal_strength, analysis.signal.confidence
    );

    let mut journal = MemoryJournal::open(args.market.memory.as_deref())?;
    let mut store = journal.replay(&config.memory)?;
    journal.record(&mut store, market::analysis_memory(&analysis))?;

    let context = MemoryContext::new()
        .with_token(token.as_str())
        .with_kind(MemoryKind::Analysis)
        .with_conditions(market::market_conditions(&analysis));
    let recalled = store.get_relevant(&context, args.recall, None);
    let performance = store.get_performance_metrics();

    match args.market.output.as_str() {
        "json" => {
            let report = EvaluateReport {
                analysis: &analysis,
                recalled: &recalled,
                performance,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{}", analysis_summary(&analysis));
            println!("{}", memory_summary(&recalled, &performance));
        }
    }

    journal.save(config.memory.max_size)?;
    Ok(())
}
