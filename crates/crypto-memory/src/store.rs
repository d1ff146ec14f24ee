//! Dual-horizon memory store.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use crypto_core::error::MemoryError;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::config::MemoryConfig;
use crate::consolidate::merge_group;
use crate::entry::{MarketConditions, MemoryEntry, MemoryKind, MemoryPayload};
use crate::stats::{PerformanceMetrics, TradeStats};

/// Recency decays linearly to zero over one day.
const RECENCY_HORIZON_SECS: f64 = 86_400.0;

const RECENCY_WEIGHT: f64 = 0.3;
const TOKEN_WEIGHT: f64 = 0.3;
const KIND_WEIGHT: f64 = 0.2;
const CONDITIONS_WEIGHT: f64 = 0.2;

/// What a recall query is about. Absent fields do not contribute to relevance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryContext {
    pub token: Option<String>,
    pub kind: Option<MemoryKind>,
    pub market_conditions: Option<MarketConditions>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_kind(mut self, kind: MemoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_conditions(mut self, conditions: MarketConditions) -> Self {
        self.market_conditions = Some(conditions);
        self
    }
}

/// Bounded short-term and long-term memory with trade performance tracking.
///
/// Short-term holds the most recent `short_capacity` entries. Long-term holds
/// the most recent `max_size` entries whose importance reached the
/// configured threshold. Both evict oldest first.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    config: MemoryConfig,
    short_term: VecDeque<MemoryEntry>,
    long_term: VecDeque<MemoryEntry>,
    stats: TradeStats,
    next_id: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let config = MemoryConfig::default();
        Self {
            short_term: VecDeque::with_capacity(config.short_capacity),
            long_term: VecDeque::new(),
            stats: TradeStats::default(),
            next_id: 0,
            config,
        }
    }
}

impl MemoryStore {
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        Ok(Self {
            short_term: VecDeque::with_capacity(config.short_capacity),
            long_term: VecDeque::new(),
            stats: TradeStats::default(),
            next_id: 0,
            config,
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Short-term entries, oldest first.
    pub fn short_term(&self) -> &VecDeque<MemoryEntry> {
        &self.short_term
    }

    /// Long-term entries, oldest first.
    pub fn long_term(&self) -> &VecDeque<MemoryEntry> {
        &self.long_term
    }

    pub fn short_term_len(&self) -> usize {
        self.short_term.len()
    }

    pub fn long_term_len(&self) -> usize {
        self.long_term.len()
    }

    /// Store an observation, logging and absorbing any failure.
    pub fn add(&mut self, payload: impl Into<MemoryPayload>, metadata: Option<Map<String, Value>>) {
        if let Err(e) = self.try_add(payload, metadata) {
            error!("Failed to store memory: {}", e);
        }
    }

    /// Store an observation timestamped now, returning its id.
    pub fn try_add(
        &mut self,
        payload: impl Into<MemoryPayload>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<u64, MemoryError> {
        self.add_at(payload, metadata, Utc::now())
    }

    /// Store an observation with an explicit timestamp.
    ///
    /// Invalid payloads are rejected before any state changes.
    pub fn add_at(
        &mut self,
        payload: impl Into<MemoryPayload>,
        metadata: Option<Map<String, Value>>,
        timestamp: DateTime<Utc>,
    ) -> Result<u64, MemoryError> {
        let payload = payload.into();
        payload.validate()?;

        let id = self.next_id;
        self.next_id += 1;

        let importance = payload.importance();
        let entry = MemoryEntry {
            id,
            timestamp,
            payload,
            importance,
            metadata,
        };
        debug!(
            "Stored {} memory {} with importance {:.2}",
            entry.kind(),
            id,
            importance
        );

        if let MemoryPayload::Trade(trade) = &entry.payload {
            self.stats.record(trade);
        }

        if importance >= self.config.importance_threshold {
            push_bounded(&mut self.long_term, entry.clone(), self.config.max_size);
        }
        push_bounded(&mut self.short_term, entry, self.config.short_capacity);

        if self.short_term.len() >= self.config.consolidation_interval {
            self.consolidate_at(timestamp);
        }

        Ok(id)
    }

    /// Recall up to `limit` entries most relevant to `context`, best first.
    pub fn get_relevant(
        &self,
        context: &MemoryContext,
        limit: usize,
        kinds: Option<&[MemoryKind]>,
    ) -> Vec<&MemoryEntry> {
        self.get_relevant_at(context, limit, kinds, Utc::now())
    }

    /// [`get_relevant`](Self::get_relevant) evaluated at a fixed instant.
    ///
    /// Both horizons are searched. An entry held in both appears once. Ties
    /// keep short-term order ahead of long-term order.
    pub fn get_relevant_at(
        &self,
        context: &MemoryContext,
        limit: usize,
        kinds: Option<&[MemoryKind]>,
        now: DateTime<Utc>,
    ) -> Vec<&MemoryEntry> {
        let mut scored: Vec<(f64, &MemoryEntry)> = self
            .short_term
            .iter()
            .chain(self.long_term.iter())
            .filter(|entry| kinds.map_or(true, |kinds| kinds.contains(&entry.kind())))
            .map(|entry| (relevance(entry, context, now), entry))
            .collect();

        // Stable, so ties keep buffer order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(_, entry)| seen.insert(entry.id))
            .map(|(_, entry)| entry)
            .take(limit)
            .collect()
    }

    /// The newest `limit` short-term entries, oldest first.
    pub fn get_recent(&self, limit: usize) -> Vec<&MemoryEntry> {
        let skip = self.short_term.len().saturating_sub(limit);
        self.short_term.iter().skip(skip).collect()
    }

    /// Performance over every trade ever stored, independent of eviction.
    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        self.stats.metrics()
    }

    /// Merge short-term entries sharing kind and token, logging any failure.
    pub fn consolidate(&mut self) {
        self.consolidate_at(Utc::now());
    }

    pub fn consolidate_at(&mut self, now: DateTime<Utc>) {
        match self.try_consolidate_at(now) {
            Ok(0) => {}
            Ok(merged) => info!(
                "Consolidated short-term memory: {} entries merged, {} remain",
                merged,
                self.short_term.len()
            ),
            Err(e) => error!("Memory consolidation failed: {}", e),
        }
    }

    /// Replace short-term memory with one entry per (kind, token) group.
    ///
    /// Groups keep the order of their first member. Single-member groups are
    /// kept unchanged. Merged entries are stamped `now`, take the highest
    /// importance of the group and get a fresh id. On error short-term
    /// memory is left untouched. Returns how many entries were folded away.
    pub fn try_consolidate_at(&mut self, now: DateTime<Utc>) -> Result<usize, MemoryError> {
        let mut index: HashMap<(MemoryKind, &str), usize> = HashMap::new();
        let mut groups: Vec<Vec<&MemoryEntry>> = Vec::new();

        for entry in &self.short_term {
            let key = (entry.kind(), entry.token().unwrap_or(""));
            let i = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[i].push(entry);
        }

        let mut next_id = self.next_id;
        let mut consolidated = VecDeque::with_capacity(groups.len());
        for group in &groups {
            if let [single] = group.as_slice() {
                consolidated.push_back((*single).clone());
                continue;
            }

            let payload = merge_group(group)?;
            let importance = group.iter().map(|e| e.importance).fold(0.0, f64::max);
            consolidated.push_back(MemoryEntry {
                id: next_id,
                timestamp: now,
                payload,
                importance,
                metadata: None,
            });
            next_id += 1;
        }

        let merged = self.short_term.len() - consolidated.len();
        self.short_term = consolidated;
        self.next_id = next_id;
        Ok(merged)
    }
}

fn push_bounded(buffer: &mut VecDeque<MemoryEntry>, entry: MemoryEntry, capacity: usize) {
    while buffer.len() >= capacity {
        buffer.pop_front();
    }
    buffer.push_back(entry);
}

fn relevance(entry: &MemoryEntry, context: &MemoryContext, now: DateTime<Utc>) -> f64 {
    let age_secs = (now - entry.timestamp).num_milliseconds() as f64 / 1000.0;
    let recency = if age_secs <= 0.0 {
        1.0
    } else {
        (1.0 - age_secs / RECENCY_HORIZON_SECS).max(0.0)
    };
    let mut score = RECENCY_WEIGHT * recency;

    if let Some(token) = context.token.as_deref() {
        if entry.token() == Some(token) {
            score += TOKEN_WEIGHT;
        }
    }
    if context.kind.as_ref() == Some(&entry.kind()) {
        score += KIND_WEIGHT;
    }
    if let (Some(wanted), Some(actual)) = (
        context.market_conditions.as_ref(),
        entry.payload.market_conditions(),
    ) {
        score += CONDITIONS_WEIGHT * wanted.similarity(actual);
    }

    score.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{AnalysisMemory, ErrorMemory, NoteMemory, TradeMemory};
    use chrono::Duration;
    use crypto_core::types::Side;

    fn trade(token: &str, size: f64, profit: Option<f64>) -> TradeMemory {
        TradeMemory {
            token: token.into(),
            action: Side::Buy,
            size,
            profit,
            price: None,
            market_conditions: None,
        }
    }

    fn note(token: &str) -> NoteMemory {
        NoteMemory {
            kind: "experience".into(),
            token: Some(token.into()),
            fields: Map::new(),
            market_conditions: None,
        }
    }

    fn config(short_capacity: usize, max_size: usize, threshold: f64) -> MemoryConfig {
        MemoryConfig {
            max_size,
            short_capacity,
            importance_threshold: threshold,
            consolidation_interval: 1_000,
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = MemoryConfig {
            max_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            MemoryStore::new(bad),
            Err(MemoryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_short_term_capacity() {
        let mut store = MemoryStore::new(config(10, 100, 0.9)).unwrap();
        for i in 0..25 {
            store.add(note(&format!("T{i}")), None);
        }

        assert_eq!(store.short_term_len(), 10);
        // Notes sit at 0.5, below the threshold
        assert_eq!(store.long_term_len(), 0);
        // Oldest evicted first
        assert_eq!(store.short_term()[0].token(), Some("T15"));
        assert_eq!(store.short_term()[9].token(), Some("T24"));
    }

    #[test]
    fn test_long_term_capacity_and_threshold() {
        let mut store = MemoryStore::new(config(100, 3, 0.6)).unwrap();
        for i in 0..5 {
            store.add(
                ErrorMemory {
                    token: Some(format!("T{i}")),
                    message: "rpc timeout".into(),
                },
                None,
            );
        }
        store.add(note("LOW"), None);

        assert_eq!(store.long_term_len(), 3);
        assert_eq!(store.long_term()[0].token(), Some("T2"));
        assert!(store.long_term().iter().all(|e| e.importance >= 0.6));
    }

    #[test]
    fn test_capacity_holds_under_default_config() {
        let mut store = MemoryStore::default();
        for i in 0..250 {
            store.add(trade(&format!("T{i}"), 10.0, None), None);
            assert!(store.short_term_len() <= store.config().short_capacity);
            assert!(store.long_term_len() <= store.config().max_size);
        }
    }

    #[test]
    fn test_important_entry_in_both_buffers_recalled_once() {
        let mut store = MemoryStore::new(config(10, 10, 0.5)).unwrap();
        let id = store
            .try_add(trade("SOL", 50_000.0, Some(5_000.0)), None)
            .unwrap();
        assert_eq!(store.short_term()[0].importance, 1.0);
        assert_eq!(store.long_term()[0].id, id);

        let ctx = MemoryContext::new().with_token("SOL");
        let recalled = store.get_relevant(&ctx, 10, None);
        assert_eq!(recalled.len(), 1);
        assert_eq!(recalled[0].id, id);
    }

    #[test]
    fn test_invalid_entry_leaves_state_untouched() {
        let mut store = MemoryStore::default();
        assert!(store.try_add(trade("SOL", f64::NAN, None), None).is_err());
        store.add(trade("SOL", 10.0, Some(f64::INFINITY)), None);

        assert_eq!(store.short_term_len(), 0);
        assert_eq!(store.get_performance_metrics().total_trades, 0);
    }

    #[test]
    fn test_relevance_ordering() {
        let now = Utc::now();
        let mut store = MemoryStore::new(config(10, 10, 1.0)).unwrap();
        let stale = now - Duration::hours(30);

        let sol_old = store.add_at(trade("SOL", 10.0, None), None, stale).unwrap();
        let jup_new = store.add_at(trade("JUP", 10.0, None), None, now).unwrap();
        let sol_new = store.add_at(trade("SOL", 10.0, None), None, now).unwrap();

        let ctx = MemoryContext::new().with_token("SOL");
        let ids: Vec<u64> = store
            .get_relevant_at(&ctx, 10, None, now)
            .iter()
            .map(|e| e.id)
            .collect();
        // 0.6, 0.3 (stale recency floors at 0), 0.3: tie keeps insertion order
        assert_eq!(ids, vec![sol_new, sol_old, jup_new]);

        let top = store.get_relevant_at(&ctx, 1, None, now);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].id, sol_new);
    }

    #[test]
    fn test_relevance_kind_and_conditions() {
        let now = Utc::now();
        let mut store = MemoryStore::new(config(10, 10, 1.0)).unwrap();
        let bullish = MarketConditions {
            trend: Some("bullish".into()),
            volatility: Some("high".into()),
            ..Default::default()
        };

        let analysis = store
            .add_at(
                AnalysisMemory {
                    token: "SOL".into(),
                    confidence: 0.4,
                    risk_score: 0.2,
                    action: None,
                    market_conditions: Some(bullish.clone()),
                },
                None,
                now,
            )
            .unwrap();
        store.add_at(note("SOL"), None, now).unwrap();

        let ctx = MemoryContext::new()
            .with_kind(MemoryKind::Analysis)
            .with_conditions(bullish);
        let recalled = store.get_relevant_at(&ctx, 5, None, now);
        assert_eq!(recalled[0].id, analysis);

        let only_notes = [MemoryKind::Note("experience".into())];
        let filtered = store.get_relevant_at(&ctx, 5, Some(&only_notes[..]), now);
        assert_eq!(filtered.len(), 1);
        assert!(matches!(filtered[0].payload, MemoryPayload::Note(_)));
    }

    #[test]
    fn test_future_timestamp_counts_as_fresh() {
        let now = Utc::now();
        let entry = MemoryEntry {
            id: 0,
            timestamp: now + Duration::hours(1),
            payload: note("SOL").into(),
            importance: 0.5,
            metadata: None,
        };
        let score = relevance(&entry, &MemoryContext::new(), now);
        assert!((score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_get_recent() {
        let mut store = MemoryStore::default();
        for i in 0..5 {
            store.add(note(&format!("T{i}")), None);
        }

        let tokens: Vec<_> = store
            .get_recent(2)
            .iter()
            .filter_map(|e| e.token())
            .collect();
        assert_eq!(tokens, vec!["T3", "T4"]);
        assert_eq!(store.get_recent(50).len(), 5);
    }

    #[test]
    fn test_consolidation_merges_groups() {
        let now = Utc::now() + Duration::seconds(5);
        let mut store = MemoryStore::new(config(10, 10, 1.0)).unwrap();
        store.add(trade("SOL", 100.0, Some(10.0)), None);
        store.add(trade("JUP", 40.0, None), None);
        store.add(trade("SOL", 300.0, Some(30.0)), None);

        let merged = store.try_consolidate_at(now).unwrap();
        assert_eq!(merged, 1);
        assert_eq!(store.short_term_len(), 2);

        let sol = &store.short_term()[0];
        assert_eq!(sol.timestamp, now);
        let MemoryPayload::Trade(t) = &sol.payload else {
            panic!("expected a trade");
        };
        assert!((t.size - 200.0).abs() < 1e-12);
        assert_eq!(t.profit, Some(20.0));

        // Singletons survive as-is
        assert_eq!(store.short_term()[1].token(), Some("JUP"));
        assert_ne!(store.short_term()[1].timestamp, now);
    }

    #[test]
    fn test_consolidation_is_idempotent() {
        let mut store = MemoryStore::new(config(10, 10, 1.0)).unwrap();
        store.add(note("SOL"), None);
        store.add(note("SOL"), None);
        store.consolidate();
        let first: Vec<MemoryEntry> = store.short_term().iter().cloned().collect();

        store.consolidate();
        let second: Vec<MemoryEntry> = store.short_term().iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_consolidation_triggered_by_interval() {
        let cfg = MemoryConfig {
            max_size: 100,
            short_capacity: 100,
            importance_threshold: 1.0,
            consolidation_interval: 4,
        };
        let mut store = MemoryStore::new(cfg).unwrap();
        for _ in 0..4 {
            store.add(trade("SOL", 10.0, Some(1.0)), None);
        }

        assert_eq!(store.short_term_len(), 1);
        // Stats keep the raw trades
        assert_eq!(store.get_performance_metrics().total_trades, 4);
    }

    #[test]
    fn test_merged_entries_get_fresh_ids() {
        let mut store = MemoryStore::new(config(10, 10, 0.0)).unwrap();
        let a = store.try_add(note("SOL"), None).unwrap();
        let b = store.try_add(note("SOL"), None).unwrap();
        store.consolidate();

        let merged_id = store.short_term()[0].id;
        assert!(merged_id != a && merged_id != b);
        let next = store.try_add(note("JUP"), None).unwrap();
        assert!(next > merged_id);

        // Long-term still holds both originals next to the merged entry
        let recalled = store.get_relevant(&MemoryContext::new(), 10, None);
        assert_eq!(recalled.len(), 4);
    }

    #[test]
    fn test_performance_metrics() {
        let mut store = MemoryStore::default();
        store.add(trade("SOL", 100.0, Some(50.0)), None);
        store.add(trade("SOL", 100.0, Some(-10.0)), None);
        store.add(
            ErrorMemory {
                token: None,
                message: "slippage".into(),
            },
            None,
        );

        let metrics = store.get_performance_metrics();
        assert_eq!(metrics.total_trades, 2);
        assert!((metrics.win_rate - 0.5).abs() < 1e-12);
        assert!((metrics.avg_profit - 20.0).abs() < 1e-12);
    }
}
