//! Bounded dual-horizon memory for the trading agent.
//!
//! Short-term memory keeps the most recent entries, long-term memory keeps
//! the most recent *important* ones. Entries are typed by what they record
//! (trades, errors, analyses, free-form notes), scored for importance on
//! insertion and recalled by relevance to a context.

pub mod config;
mod consolidate;
pub mod entry;
pub mod stats;
pub mod store;

pub use config::MemoryConfig;
pub use entry::{
    AnalysisMemory, ErrorMemory, MarketConditions, MemoryEntry, MemoryKind, MemoryPayload,
    NoteMemory, TradeMemory,
};
pub use stats::{PerformanceMetrics, TradeStats};
pub use store::{MemoryContext, MemoryStore};
