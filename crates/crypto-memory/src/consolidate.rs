//! Merging of same-kind, same-token memory groups.
//!
//! Numeric fields are averaged, everything else takes the last value seen.

use crypto_core::error::MemoryError;
use serde_json::{Map, Value};

use crate::entry::{
    AnalysisMemory, ErrorMemory, MarketConditions, MemoryEntry, MemoryPayload, NoteMemory,
    TradeMemory,
};

/// Merge the payloads of a group of entries sharing kind and token.
pub(crate) fn merge_group(group: &[&MemoryEntry]) -> Result<MemoryPayload, MemoryError> {
    let first = group
        .first()
        .ok_or_else(|| MemoryError::Consolidation("empty group".into()))?;

    match &first.payload {
        MemoryPayload::Trade(_) => {
            let trades = collect(group, |p| match p {
                MemoryPayload::Trade(t) => Some(t),
                _ => None,
            })?;
            Ok(merge_trades(&trades).into())
        }
        MemoryPayload::Error(_) => {
            let errors = collect(group, |p| match p {
                MemoryPayload::Error(e) => Some(e),
                _ => None,
            })?;
            Ok(merge_errors(&errors).into())
        }
        MemoryPayload::Analysis(_) => {
            let analyses = collect(group, |p| match p {
                MemoryPayload::Analysis(a) => Some(a),
                _ => None,
            })?;
            Ok(merge_analyses(&analyses).into())
        }
        MemoryPayload::Note(_) => {
            let notes = collect(group, |p| match p {
                MemoryPayload::Note(n) => Some(n),
                _ => None,
            })?;
            Ok(merge_notes(&notes).into())
        }
    }
}

fn collect<'a, T>(
    group: &[&'a MemoryEntry],
    extract: impl Fn(&'a MemoryPayload) -> Option<&'a T>,
) -> Result<Vec<&'a T>, MemoryError> {
    group
        .iter()
        .map(|entry| {
            extract(&entry.payload).ok_or_else(|| {
                MemoryError::Consolidation(format!("group mixes {} with other kinds", entry.kind()))
            })
        })
        .collect()
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn last_conditions<'a>(
    conditions: impl DoubleEndedIterator<Item = Option<&'a MarketConditions>>,
) -> Option<MarketConditions> {
    conditions.rev().flatten().next().cloned()
}

fn merge_trades(trades: &[&TradeMemory]) -> TradeMemory {
    // Callers guarantee a non-empty group
    let last = trades[trades.len() - 1];
    TradeMemory {
        token: last.token.clone(),
        action: last.action,
        size: mean(trades.iter().map(|t| t.size)).unwrap_or(0.0),
        profit: mean(trades.iter().filter_map(|t| t.profit)),
        price: mean(trades.iter().filter_map(|t| t.price)),
        market_conditions: last_conditions(trades.iter().map(|t| t.market_conditions.as_ref())),
    }
}

fn merge_errors(errors: &[&ErrorMemory]) -> ErrorMemory {
    let last = errors[errors.len() - 1];
    ErrorMemory {
        token: last.token.clone(),
        message: last.message.clone(),
    }
}

fn merge_analyses(analyses: &[&AnalysisMemory]) -> AnalysisMemory {
    let last = analyses[analyses.len() - 1];
    AnalysisMemory {
        token: last.token.clone(),
        confidence: mean(analyses.iter().map(|a| a.confidence)).unwrap_or(0.0),
        risk_score: mean(analyses.iter().map(|a| a.risk_score)).unwrap_or(0.0),
        action: analyses.iter().rev().find_map(|a| a.action),
        market_conditions: last_conditions(analyses.iter().map(|a| a.market_conditions.as_ref())),
    }
}

fn merge_notes(notes: &[&NoteMemory]) -> NoteMemory {
    let last = notes[notes.len() - 1];
    NoteMemory {
        kind: last.kind.clone(),
        token: last.token.clone(),
        fields: merge_fields(notes.iter().map(|n| &n.fields)),
        market_conditions: last_conditions(notes.iter().map(|n| n.market_conditions.as_ref())),
    }
}

enum Field {
    Numbers(Vec<f64>),
    Other(Value),
}

fn merge_fields<'a>(maps: impl Iterator<Item = &'a Map<String, Value>>) -> Map<String, Value> {
    let mut fields: Vec<(String, Field)> = Vec::new();

    for map in maps {
        for (key, value) in map {
            let index = fields.iter().position(|(k, _)| k == key);
            let index = index.unwrap_or_else(|| {
                fields.push((key.clone(), Field::Numbers(Vec::new())));
                fields.len() - 1
            });
            let slot = &mut fields[index].1;

            match (value.as_f64(), slot) {
                (Some(n), Field::Numbers(numbers)) => numbers.push(n),
                // A number after a non-numeric value starts a fresh average
                (Some(n), slot) => *slot = Field::Numbers(vec![n]),
                (None, slot) => *slot = Field::Other(value.clone()),
            }
        }
    }

    fields
        .into_iter()
        .map(|(key, field)| {
            let value = match field {
                Field::Numbers(numbers) => mean(numbers).map(Value::from).unwrap_or(Value::Null),
                Field::Other(value) => value,
            };
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crypto_core::types::Side;
    use serde_json::json;

    fn entry(id: u64, payload: MemoryPayload) -> MemoryEntry {
        MemoryEntry {
            id,
            timestamp: Utc::now(),
            importance: payload.importance(),
            payload,
            metadata: None,
        }
    }

    fn trade(size: f64, profit: Option<f64>, trend: Option<&str>) -> MemoryPayload {
        TradeMemory {
            token: "SOL".into(),
            action: Side::Buy,
            size,
            profit,
            price: None,
            market_conditions: trend.map(|t| MarketConditions {
                trend: Some(t.into()),
                ..Default::default()
            }),
        }
        .into()
    }

    #[test]
    fn test_merge_trades() {
        let a = entry(1, trade(100.0, Some(10.0), Some("bullish")));
        let b = entry(2, trade(300.0, None, Some("bearish")));
        let c = entry(3, trade(200.0, Some(-4.0), None));

        let MemoryPayload::Trade(merged) = merge_group(&[&a, &b, &c]).unwrap() else {
            panic!("expected a trade");
        };
        assert!((merged.size - 200.0).abs() < 1e-12);
        assert_eq!(merged.profit, Some(3.0));
        assert_eq!(merged.price, None);
        assert_eq!(
            merged.market_conditions.and_then(|c| c.trend).as_deref(),
            Some("bearish")
        );
    }

    #[test]
    fn test_merge_note_fields() {
        let note = |fields: Value| -> MemoryPayload {
            NoteMemory {
                kind: "experience".into(),
                token: None,
                fields: fields.as_object().cloned().unwrap_or_default(),
                market_conditions: None,
            }
            .into()
        };
        let a = entry(1, note(json!({"score": 1, "lesson": "wait"})));
        let b = entry(2, note(json!({"score": 2.0, "lesson": "size down"})));

        let MemoryPayload::Note(merged) = merge_group(&[&a, &b]).unwrap() else {
            panic!("expected a note");
        };
        assert_eq!(merged.fields["score"], json!(1.5));
        assert_eq!(merged.fields["lesson"], json!("size down"));
    }

    #[test]
    fn test_mixed_group_is_an_error() {
        let a = entry(1, trade(100.0, None, None));
        let b = entry(
            2,
            ErrorMemory {
                token: Some("SOL".into()),
                message: "boom".into(),
            }
            .into(),
        );

        assert!(matches!(
            merge_group(&[&a, &b]),
            Err(MemoryError::Consolidation(_))
        ));
    }
}
