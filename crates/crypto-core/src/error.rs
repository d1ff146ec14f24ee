//! Error types for the signal engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
///
/// `InsufficientData` and `Degenerate` are expected outcomes that resolve to
/// the indicator's neutral value. The remaining variants are faults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Degenerate input: {0}")]
    Degenerate(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Non-finite value: {0}")]
    NonFinite(String),
}

impl IndicatorError {
    /// Whether this error resolves to the neutral value rather than a fault.
    pub fn is_neutral(&self) -> bool {
        matches!(
            self,
            IndicatorError::InsufficientData { .. } | IndicatorError::Degenerate(_)
        )
    }
}

/// Market data errors.
#[derive(Error, Debug, Clone)]
pub enum DataError {
    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Signal engine and analyzer errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Invalid signal configuration: {0}")]
    InvalidConfig(String),
}

/// Memory store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("Invalid memory configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid memory entry: {0}")]
    InvalidEntry(String),

    #[error("Consolidation failed: {0}")]
    Consolidation(String),
}

/// Sizing and portfolio errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Invalid fill: {0}")]
    InvalidFill(String),

    #[error("Invalid sizing configuration: {0}")]
    InvalidConfig(String),
}

/// Trade execution errors reported by an execution collaborator.
#[derive(Error, Debug, Clone)]
pub enum ExecutionError {
    #[error("Trade rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_classification() {
        assert!(IndicatorError::InsufficientData {
            required: 15,
            available: 3
        }
        .is_neutral());
        assert!(IndicatorError::Degenerate("flat".into()).is_neutral());
        assert!(!IndicatorError::NonFinite("nan".into()).is_neutral());
        assert!(!IndicatorError::InvalidParameter("period".into()).is_neutral());
    }

    #[test]
    fn test_engine_error_from() {
        let err: EngineError = RiskError::InvalidFill("negative quantity".into()).into();
        assert!(matches!(err, EngineError::Risk(_)));
        assert_eq!(
            err.to_string(),
            "Risk error: Invalid fill: negative quantity"
        );
    }
}
