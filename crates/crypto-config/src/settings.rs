//! Configuration structures.

use crypto_core::error::EngineError;
use crypto_memory::MemoryConfig;
use crypto_risk::SizingConfig;
use crypto_signals::{AnalyzerConfig, SignalWeights};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalyzerConfig,
    #[serde(default)]
    pub signals: SignalWeights,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub portfolio: PortfolioSettings,
}

impl AppConfig {
    /// Check every section for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.logging.validate()?;
        self.analysis.validate()?;
        self.signals.validate()?;
        self.memory.validate()?;
        self.sizing.validate()?;

        if self.portfolio.initial_capital <= Decimal::ZERO {
            return Err(EngineError::Config(format!(
                "initial_capital must be positive, got {}",
                self.portfolio.initial_capital
            )));
        }
        Ok(())
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Serialization(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "crypto-agent".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }

    fn validate(&self) -> Result<(), EngineError> {
        match self.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(EngineError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Starting portfolio settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSettings {
    pub initial_capital: Decimal,
}

impl Default for PortfolioSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            initial_capital: dec!(10000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_shipped_defaults_match() {
        let shipped = parse_config(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(shipped, AppConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [signals]
            buy_threshold = 0.5

            [memory]
            short_capacity = 20

            [portfolio]
            initial_capital = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.signals.buy_threshold, 0.5);
        assert_eq!(config.signals.rsi_weight, SignalWeights::default().rsi_weight);
        assert_eq!(config.memory.short_capacity, 20);
        assert_eq!(config.memory.max_size, 1000);
        assert_eq!(config.portfolio.initial_capital, dec!(2500));
        assert_eq!(config.analysis, AnalyzerConfig::default());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.portfolio.initial_capital = Decimal::ZERO;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));

        let mut config = AppConfig::default();
        config.memory.short_capacity = 0;
        assert!(matches!(config.validate(), Err(EngineError::Memory(_))));

        let mut config = AppConfig::default();
        config.logging.format = "xml".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }
}
