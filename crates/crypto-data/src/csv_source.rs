//! CSV market data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use crypto_core::error::DataError;
use crypto_core::traits::{LiquidityProvider, MetricsProvider};
use crypto_core::types::{DepthQuote, MarketDepth, PricePoint, PriceSeries, TokenMetrics};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Price CSV record format.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(alias = "Date", alias = "date", alias = "Timestamp", alias = "time")]
    timestamp: String,
    #[serde(alias = "Price", alias = "Close", alias = "close")]
    price: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
    #[serde(alias = "Liquidity", default)]
    liquidity: f64,
    #[serde(alias = "Holders", default)]
    holders: u64,
    #[serde(alias = "Transactions", alias = "txns", default)]
    transactions: u64,
}

/// Depth CSV record format.
#[derive(Debug, Deserialize)]
struct DepthRecord {
    size: u64,
    price: f64,
    price_impact: f64,
}

/// Market data for a single token read from CSV files.
///
/// The last price row supplies the point-in-time metrics. Depth quotes are
/// optional; without them the token reports an empty depth.
#[derive(Debug, Clone)]
pub struct CsvMarketData {
    token: String,
    series: PriceSeries,
    metrics: TokenMetrics,
    depth: MarketDepth,
}

impl CsvMarketData {
    /// Load price rows from a file.
    pub fn from_path(token: &str, path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
        Self::load_prices(token, reader)
    }

    /// Load price rows from any reader.
    pub fn from_reader<R: Read>(token: &str, rdr: R) -> Result<Self, DataError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::load_prices(token, reader)
    }

    /// Attach depth quotes from a file.
    pub fn with_depth_path(self, path: impl AsRef<Path>) -> Result<Self, DataError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
        self.load_depth(reader)
    }

    /// Attach depth quotes from any reader.
    pub fn with_depth_reader<R: Read>(self, rdr: R) -> Result<Self, DataError> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(rdr);
        self.load_depth(reader)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Full price history, oldest first.
    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn metrics(&self) -> &TokenMetrics {
        &self.metrics
    }

    pub fn depth(&self) -> &MarketDepth {
        &self.depth
    }

    fn load_prices<R: Read>(token: &str, mut reader: csv::Reader<R>) -> Result<Self, DataError> {
        let mut rows = Vec::new();

        for result in reader.deserialize() {
            let record: PriceRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            if !record.price.is_finite() {
                warn!("Skipping {} row at {}: price {}", token, record.timestamp, record.price);
                continue;
            }
            let timestamp = parse_timestamp(&record.timestamp)?;
            rows.push((timestamp, record));
        }

        if rows.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        // Sort by timestamp
        rows.sort_by_key(|(timestamp, _)| *timestamp);

        let metrics = rows
            .last()
            .map(|(_, last)| TokenMetrics {
                price: last.price,
                volume: last.volume,
                liquidity: last.liquidity,
                holders: last.holders,
                transactions: last.transactions,
                error: None,
            })
            .unwrap_or_default();

        let points = rows
            .iter()
            .map(|(timestamp, record)| PricePoint::new(*timestamp, record.price))
            .collect();

        debug!("Loaded {} price points for {}", rows.len(), token);

        Ok(Self {
            token: token.to_string(),
            series: PriceSeries::with_points(token, points),
            metrics,
            depth: MarketDepth::new(),
        })
    }

    fn load_depth<R: Read>(mut self, mut reader: csv::Reader<R>) -> Result<Self, DataError> {
        for result in reader.deserialize() {
            let record: DepthRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            // Later quotes for the same size replace earlier ones
            self.depth.insert(
                record.size,
                DepthQuote {
                    price: record.price,
                    price_impact: record.price_impact,
                },
            );
        }
        debug!("Loaded {} depth quotes for {}", self.depth.len(), self.token);
        Ok(self)
    }

    fn check_token(&self, token: &str) -> Result<(), DataError> {
        if token == self.token {
            Ok(())
        } else {
            Err(DataError::TokenNotFound(token.to_string()))
        }
    }
}

#[async_trait]
impl MetricsProvider for CsvMarketData {
    async fn get_metrics(&self, token: &str) -> Result<TokenMetrics, DataError> {
        self.check_token(token)?;
        Ok(self.metrics.clone())
    }

    async fn get_history(&self, token: &str, lookback: usize) -> Result<PriceSeries, DataError> {
        self.check_token(token)?;
        Ok(self.series.tail(lookback))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[async_trait]
impl LiquidityProvider for CsvMarketData {
    async fn get_depth(&self, token: &str) -> Result<MarketDepth, DataError> {
        self.check_token(token)?;
        Ok(self.depth.clone())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(value: &str) -> Result<i64, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }

    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Ok(d.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = value.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse timestamp: {}",
        value
    )))
}
