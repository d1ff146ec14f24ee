//! Memory entries and their typed payloads.

use chrono::{DateTime, Utc};
use crypto_core::error::MemoryError;
use crypto_core::types::{Action, Side};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base importance of every entry.
const BASE_IMPORTANCE: f64 = 0.5;

/// Kind tag of a memory entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Trade,
    Error,
    Analysis,
    /// Any other tag, e.g. "experience"
    Note(String),
}

impl MemoryKind {
    /// Parse a tag string; unknown tags become notes.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "trade" => MemoryKind::Trade,
            "error" => MemoryKind::Error,
            "analysis" => MemoryKind::Analysis,
            other => MemoryKind::Note(other.to_string()),
        }
    }

    /// The tag string.
    pub fn as_str(&self) -> &str {
        match self {
            MemoryKind::Trade => "trade",
            MemoryKind::Error => "error",
            MemoryKind::Analysis => "analysis",
            MemoryKind::Note(tag) => tag,
        }
    }
}

impl std::fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative market state attached to trades and analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
}

impl MarketConditions {
    /// Fraction of the four condition keys present on both sides with equal values.
    pub fn similarity(&self, other: &MarketConditions) -> f64 {
        let pairs = [
            (&self.trend, &other.trend),
            (&self.volatility, &other.volatility),
            (&self.volume, &other.volume),
            (&self.sentiment, &other.sentiment),
        ];
        let matches = pairs
            .iter()
            .filter(|(a, b)| matches!((a, b), (Some(a), Some(b)) if a == b))
            .count();
        matches as f64 / pairs.len() as f64
    }
}

/// An executed trade and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMemory {
    pub token: String,
    pub action: Side,
    /// Trade size in quote currency
    pub size: f64,
    /// Realized profit, once known
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub market_conditions: Option<MarketConditions>,
}

/// A failure worth remembering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMemory {
    #[serde(default)]
    pub token: Option<String>,
    pub message: String,
}

/// The outcome of a market analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMemory {
    pub token: String,
    pub confidence: f64,
    pub risk_score: f64,
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub market_conditions: Option<MarketConditions>,
}

/// Free-form observation under a custom tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMemory {
    pub kind: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub market_conditions: Option<MarketConditions>,
}

/// What a memory entry records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MemoryPayload {
    Trade(TradeMemory),
    Error(ErrorMemory),
    Analysis(AnalysisMemory),
    Note(NoteMemory),
}

impl MemoryPayload {
    /// Kind tag of the payload.
    pub fn kind(&self) -> MemoryKind {
        match self {
            MemoryPayload::Trade(_) => MemoryKind::Trade,
            MemoryPayload::Error(_) => MemoryKind::Error,
            MemoryPayload::Analysis(_) => MemoryKind::Analysis,
            MemoryPayload::Note(note) => MemoryKind::from_tag(&note.kind),
        }
    }

    /// Token the payload is about, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            MemoryPayload::Trade(trade) => Some(&trade.token),
            MemoryPayload::Error(error) => error.token.as_deref(),
            MemoryPayload::Analysis(analysis) => Some(&analysis.token),
            MemoryPayload::Note(note) => note.token.as_deref(),
        }
    }

    /// Market conditions carried by the payload.
    pub fn market_conditions(&self) -> Option<&MarketConditions> {
        match self {
            MemoryPayload::Trade(trade) => trade.market_conditions.as_ref(),
            MemoryPayload::Error(_) => None,
            MemoryPayload::Analysis(analysis) => analysis.market_conditions.as_ref(),
            MemoryPayload::Note(note) => note.market_conditions.as_ref(),
        }
    }

    /// Importance heuristic, clamped to [0, 1].
    ///
    /// Large or highly (un)profitable trades, errors and confident or risky
    /// analyses rank above the 0.5 base.
    pub fn importance(&self) -> f64 {
        let bonus = match self {
            MemoryPayload::Trade(trade) => {
                let profit = trade.profit.unwrap_or(0.0);
                (trade.size.abs() / 10_000.0).min(0.3) + (profit.abs() / 1_000.0).min(0.2)
            }
            MemoryPayload::Error(_) => 0.3,
            MemoryPayload::Analysis(analysis) => {
                0.2 * analysis.confidence + 0.2 * analysis.risk_score
            }
            MemoryPayload::Note(_) => 0.0,
        };
        (BASE_IMPORTANCE + bonus).clamp(0.0, 1.0)
    }

    /// Reject payloads carrying non-finite numbers.
    pub fn validate(&self) -> Result<(), MemoryError> {
        let numbers: Vec<(&str, f64)> = match self {
            MemoryPayload::Trade(trade) => {
                let mut numbers = vec![("size", trade.size)];
                numbers.extend(trade.profit.map(|p| ("profit", p)));
                numbers.extend(trade.price.map(|p| ("price", p)));
                numbers
            }
            MemoryPayload::Error(_) => vec![],
            MemoryPayload::Analysis(analysis) => vec![
                ("confidence", analysis.confidence),
                ("risk_score", analysis.risk_score),
            ],
            MemoryPayload::Note(note) => {
                if note.kind.is_empty() {
                    return Err(MemoryError::InvalidEntry("note kind is empty".into()));
                }
                vec![]
            }
        };

        match numbers.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(MemoryError::InvalidEntry(format!(
                "{} {name} is {value}",
                self.kind()
            ))),
            None => Ok(()),
        }
    }
}

impl From<TradeMemory> for MemoryPayload {
    fn from(trade: TradeMemory) -> Self {
        MemoryPayload::Trade(trade)
    }
}

impl From<ErrorMemory> for MemoryPayload {
    fn from(error: ErrorMemory) -> Self {
        MemoryPayload::Error(error)
    }
}

impl From<AnalysisMemory> for MemoryPayload {
    fn from(analysis: AnalysisMemory) -> Self {
        MemoryPayload::Analysis(analysis)
    }
}

impl From<NoteMemory> for MemoryPayload {
    fn from(note: NoteMemory) -> Self {
        MemoryPayload::Note(note)
    }
}

/// A single remembered observation. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Store-assigned identity, unique within a store
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: MemoryPayload,
    /// Importance in [0, 1]
    pub importance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl MemoryEntry {
    /// Kind tag of the entry.
    pub fn kind(&self) -> MemoryKind {
        self.payload.kind()
    }

    /// Token the entry is about, if any.
    pub fn token(&self) -> Option<&str> {
        self.payload.token()
    }
}
