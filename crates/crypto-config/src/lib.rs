//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig, PortfolioSettings};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

/// Environment variable prefix, e.g. `CRYPTO_AGENT__SIGNALS__BUY_THRESHOLD`.
pub const ENV_PREFIX: &str = "CRYPTO_AGENT";

/// Load configuration from file and environment.
///
/// A missing file leaves every section at its default.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Parse configuration from TOML text, without environment overrides.
pub fn parse_config(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
