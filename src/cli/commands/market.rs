//! Shared market data, analysis and memory plumbing for commands.

use anyhow::{Context, Result};
use chrono::Utc;
use crypto_config::AppConfig;
use crypto_data::CsvMarketData;
use crypto_memory::{
    AnalysisMemory, MarketConditions, MemoryConfig, MemoryEntry, MemoryPayload, MemoryStore,
};
use crypto_signals::{MarketAnalysis, MarketAnalyzer, SignalEngine};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::MarketDataArgs;

/// Annualized volatility above which a market counts as volatile.
const HIGH_VOLATILITY: f64 = 1.0;
const LOW_VOLATILITY: f64 = 0.5;

/// Load the CSV market data named by the arguments.
pub fn load(args: &MarketDataArgs) -> Result<(String, CsvMarketData)> {
    if !args.data.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV file with --data (e.g. --data ./data/sol.csv)",
            args.data.display()
        );
    }

    let token = match &args.token {
        Some(token) => token.clone(),
        None => args
            .data
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .context("Cannot derive a token from the data path, pass --token")?,
    };

    let data = crypto_data::load_csv(&token, &args.data, args.depth.as_deref())
        .with_context(|| format!("Failed to load market data from {:?}", args.data))?;
    info!("Loaded {} price points for {}", data.series().len(), token);

    Ok((token, data))
}

/// Run the configured analyzer over loaded data.
pub async fn analyze(config: &AppConfig, token: &str, data: &CsvMarketData) -> MarketAnalysis {
    let analyzer = MarketAnalyzer::new(
        config.analysis.clone(),
        SignalEngine::new(config.signals.clone()),
    );
    analyzer.analyze_token(token, data, data).await
}

/// Qualitative conditions derived from an analysis.
pub fn market_conditions(analysis: &MarketAnalysis) -> MarketConditions {
    let tech = &analysis.technical;
    let trend = if tech.momentum > 0.0 {
        "bullish"
    } else if tech.momentum < 0.0 {
        "bearish"
    } else {
        "sideways"
    };
    let volatility = if tech.volatility >= HIGH_VOLATILITY {
        "high"
    } else if tech.volatility >= LOW_VOLATILITY {
        "medium"
    } else {
        "low"
    };

    MarketConditions {
        trend: Some(trend.to_string()),
        volatility: Some(volatility.to_string()),
        ..Default::default()
    }
}

/// The memory recorded for an analysis.
pub fn analysis_memory(analysis: &MarketAnalysis) -> AnalysisMemory {
    AnalysisMemory {
        token: analysis.token.clone(),
        confidence: analysis.signal.confidence,
        risk_score: analysis.signal.component("risk_score"),
        action: Some(analysis.signal.action),
        market_conditions: Some(market_conditions(analysis)),
    }
}

/// Append-only JSON journal of stored memories.
///
/// Replaying the journal in order rebuilds the same store across runs.
pub struct MemoryJournal {
    path: Option<PathBuf>,
    entries: Vec<MemoryEntry>,
}

impl MemoryJournal {
    /// Open a journal; a missing path or file starts empty.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let entries = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read memory journal {:?}", path))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse memory journal {:?}", path))?
            }
            _ => Vec::new(),
        };

        Ok(Self {
            path: path.map(Path::to_path_buf),
            entries,
        })
    }

    /// Rebuild a store from the journal.
    pub fn replay(&self, config: &MemoryConfig) -> Result<MemoryStore> {
        let mut store = MemoryStore::new(config.clone()).context("Invalid memory configuration")?;
        for entry in &self.entries {
            let replayed =
                store.add_at(entry.payload.clone(), entry.metadata.clone(), entry.timestamp);
            if let Err(e) = replayed {
                warn!("Skipping journal entry {}: {}", entry.id, e);
            }
        }
        info!("Replayed {} memories", self.entries.len());
        Ok(store)
    }

    /// Store a payload and append it to the journal.
    pub fn record(
        &mut self,
        store: &mut MemoryStore,
        payload: impl Into<MemoryPayload>,
    ) -> Result<u64> {
        let payload = payload.into();
        let timestamp = Utc::now();
        let id = store.add_at(payload.clone(), None, timestamp)?;

        self.entries.push(MemoryEntry {
            id,
            timestamp,
            importance: payload.importance(),
            payload,
            metadata: None,
        });
        Ok(id)
    }

    /// Write the newest `keep` entries back to disk, if the journal has a path.
    pub fn save(&mut self, keep: usize) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let excess = self.entries.len().saturating_sub(keep);
        self.entries.drain(..excess);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)
            .with_context(|| format!("Failed to write memory journal {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_core::types::{PriceSeries, TokenMetrics};
    use crypto_memory::MemoryKind;

    fn analysis(prices: &[f64]) -> MarketAnalysis {
        let history = PriceSeries::from_prices("SOL", prices);
        let metrics = TokenMetrics {
            price: prices.last().copied().unwrap_or_default(),
            ..Default::default()
        };
        MarketAnalyzer::default().evaluate("SOL", &history, &metrics, &Default::default())
    }

    #[test]
    fn test_market_conditions() {
        let rising: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let conditions = market_conditions(&analysis(&rising));
        assert_eq!(conditions.trend.as_deref(), Some("bullish"));

        let flat = vec![100.0; 40];
        let conditions = market_conditions(&analysis(&flat));
        assert_eq!(conditions.trend.as_deref(), Some("sideways"));
        assert_eq!(conditions.volatility.as_deref(), Some("low"));
    }

    #[test]
    fn test_journal_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("crypto-agent-journal-{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let config = MemoryConfig::default();
        let mut journal = MemoryJournal::open(Some(path.as_path())).unwrap();
        let mut store = journal.replay(&config).unwrap();
        journal
            .record(&mut store, analysis_memory(&analysis(&[100.0; 40])))
            .unwrap();
        journal.save(10).unwrap();

        let reopened = MemoryJournal::open(Some(path.as_path())).unwrap();
        let store = reopened.replay(&config).unwrap();
        assert_eq!(store.short_term_len(), 1);
        assert_eq!(store.short_term()[0].kind(), MemoryKind::Analysis);

        let _ = std::fs::remove_file(&path);
    }
}
