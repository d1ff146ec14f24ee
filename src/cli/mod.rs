//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crypto-agent")]
#[command(author, version, about = "Crypto signal and memory engine")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overrides the configured level
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a token from CSV market data
    Evaluate(EvaluateArgs),
    /// Analyze a token and size a trade for a fresh portfolio
    Size(SizeArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct MarketDataArgs {
    /// Price history CSV (timestamp,price[,volume,liquidity,holders,transactions])
    #[arg(short, long)]
    pub data: PathBuf,

    /// Depth quotes CSV (size,price,price_impact)
    #[arg(long)]
    pub depth: Option<PathBuf>,

    /// Token identifier, defaults to the data file name
    #[arg(short, long)]
    pub token: Option<String>,

    /// Memory journal (JSON) to recall from and record into
    #[arg(long)]
    pub memory: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(clap::Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub market: MarketDataArgs,

    /// Number of recalled memories to show
    #[arg(long, default_value = "10")]
    pub recall: usize,
}

#[derive(clap::Args)]
pub struct SizeArgs {
    #[command(flatten)]
    pub market: MarketDataArgs,

    /// Starting capital, defaults to the configured initial capital
    #[arg(long)]
    pub capital: Option<f64>,
}
