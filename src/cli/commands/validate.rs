//! Validate configuration command.

use anyhow::Result;
use crypto_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    if !config_path.exists() {
        anyhow::bail!("Configuration file {:?} does not exist", config_path);
    }

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Lookback: {} points", config.analysis.lookback_period);
    println!(
        "Thresholds: buy > {}, sell < {}",
        config.signals.buy_threshold, config.signals.sell_threshold
    );
    println!(
        "Memory: {} short-term, {} long-term",
        config.memory.short_capacity, config.memory.max_size
    );
    println!("Max position: {}", config.sizing.max_position_pct);
    println!("Max liquidity share: {}", config.sizing.max_liquidity_pct);
    println!("Initial capital: {}", config.portfolio.initial_capital);

    Ok(())
}
