//! Market data sources for the signal engine.

mod csv_source;

pub use csv_source::CsvMarketData;

use crypto_core::error::DataError;
use std::path::Path;

/// Load a token's price history and, optionally, its depth quotes from CSV.
pub fn load_csv(
    token: &str,
    prices: impl AsRef<Path>,
    depth: Option<&Path>,
) -> Result<CsvMarketData, DataError> {
    let source = CsvMarketData::from_path(token, prices)?;
    match depth {
        Some(path) => source.with_depth_path(path),
        None => Ok(source),
    }
}
