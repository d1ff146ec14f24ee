//! Price history types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Observed price
    pub price: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Ordered price history for a single token.
///
/// Points are expected in ascending timestamp order. Neither ordering nor
/// uniqueness of timestamps is enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Token identifier
    pub token: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Create an empty series.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            points: Vec::new(),
        }
    }

    /// Create a series from existing points.
    pub fn with_points(token: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            token: token.into(),
            points,
        }
    }

    /// Create a series from bare prices, one point per minute starting at epoch.
    pub fn from_prices(token: impl Into<String>, prices: &[f64]) -> Self {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint::new(i as i64 * 60_000, price))
            .collect();
        Self::with_points(token, points)
    }

    /// Append a point.
    pub fn push(&mut self, point: PricePoint) {
        self.points.push(point);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Extract prices as a vector.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Simple period-over-period returns.
    ///
    /// Returns with a zero or non-finite result are dropped, so the output
    /// can be shorter than `len() - 1`.
    pub fn returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter_map(|w| {
                let base = w[0].price;
                if base == 0.0 {
                    return None;
                }
                let ret = (w[1].price - base) / base;
                ret.is_finite().then_some(ret)
            })
            .collect()
    }

    /// Most recent price.
    pub fn last_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// The last `n` points as a new series.
    pub fn tail(&self, n: usize) -> PriceSeries {
        let start = self.points.len().saturating_sub(n);
        Self::with_points(self.token.clone(), self.points[start..].to_vec())
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self {
            token: String::new(),
            points: iter.into_iter().collect(),
        }
    }
}
