//! Moving average indicators.

use crypto_core::error::IndicatorError;
use crypto_core::traits::{validate_series, Indicator};

use crate::simd;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if self.period == 0 || data.len() < self.period {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len() - self.period + 1);
        let period_f64 = self.period as f64;

        // Initial sum
        let mut sum = simd::sum(&data[..self.period]);
        result.push(sum / period_f64);

        // Sliding window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period] + data[i];
            result.push(sum / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "SMA period must be greater than 0".into(),
            ));
        }
        validate_series(data, self.period)
    }
}

/// Exponential Moving Average (EMA).
///
/// Uses the smoothing factor `2 / (span + 1)` and is seeded with the first
/// value rather than an initial SMA, so it yields one value per input point.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        let multiplier = 2.0 / (span as f64 + 1.0);
        Self { span, multiplier }
    }

    /// Get the smoothing factor.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let Some((&first, rest)) = data.split_first() else {
            return vec![];
        };
        if self.span == 0 {
            return vec![];
        }

        let mut result = Vec::with_capacity(data.len());

        // Incremental form: a constant input leaves the average exactly unchanged
        let mut ema = first;
        result.push(ema);
        for &price in rest {
            ema += (price - ema) * self.multiplier;
            result.push(ema);
        }

        result
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA span must be greater than 0".into(),
            ));
        }
        validate_series(data, 1)
    }
}
