//! Volatility indicators.

use crypto_core::error::IndicatorError;
use crypto_core::traits::{validate_series, Indicator, MultiOutputIndicator, Statistic};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::moving_average::Sma;
use crate::{ensure_finite, or_neutral, simd, MIN_STD_DEV, TRADING_DAYS};

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
    /// Bandwidth ((upper - lower) / middle)
    pub bandwidth: f64,
    /// %B ((price - lower) / (upper - lower)), 0.5 for a zero-width band
    pub percent_b: f64,
}

impl BollingerOutput {
    /// Check if price is above upper band.
    pub fn is_overbought(&self, price: f64) -> bool {
        price > self.upper
    }

    /// Check if price is below lower band.
    pub fn is_oversold(&self, price: f64) -> bool {
        price < self.lower
    }
}

/// Bollinger Bands.
///
/// Consists of a middle band (SMA) with upper and lower bands
/// at a specified number of sample standard deviations.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<BollingerOutput> {
        if self.period < 2 || data.len() < self.period {
            return vec![];
        }

        let means = Sma::new(self.period).calculate(data);
        let std_devs = simd::rolling_std(data, self.period);

        means
            .iter()
            .zip(std_devs.iter())
            .enumerate()
            .map(|(i, (&mean, &std_dev))| {
                let upper = mean + self.std_dev_multiplier * std_dev;
                let lower = mean - self.std_dev_multiplier * std_dev;

                let bandwidth = if mean != 0.0 {
                    (upper - lower) / mean
                } else {
                    0.0
                };

                let price = data[self.period - 1 + i];
                // Rounding leaves flat windows with a sliver of width
                let percent_b = if std_dev > MIN_STD_DEV * mean.abs().max(1.0) {
                    (price - lower) / (upper - lower)
                } else {
                    0.5
                };

                BollingerOutput {
                    upper,
                    middle: mean,
                    lower,
                    bandwidth,
                    percent_b,
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "Bollinger period must be at least 2".into(),
            ));
        }
        if !self.std_dev_multiplier.is_finite() || self.std_dev_multiplier < 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "Std dev multiplier must be non-negative, got {}",
                self.std_dev_multiplier
            )));
        }
        validate_series(data, self.period)
    }
}

/// Annualized volatility of a return series.
///
/// Sample standard deviation scaled by the square root of the number of
/// periods per year.
#[derive(Debug, Clone)]
pub struct Volatility {
    periods_per_year: f64,
}

impl Volatility {
    /// Volatility annualized over daily periods.
    pub fn annualized() -> Self {
        Self::with_periods_per_year(TRADING_DAYS)
    }

    /// Volatility annualized over a custom number of periods.
    pub fn with_periods_per_year(periods_per_year: f64) -> Self {
        Self { periods_per_year }
    }
}

impl Default for Volatility {
    fn default() -> Self {
        Self::annualized()
    }
}

impl Statistic for Volatility {
    fn compute(&self, returns: &[f64]) -> Result<f64, IndicatorError> {
        validate_series(returns, self.min_len())?;
        let std_dev = returns.iter().std_dev();
        ensure_finite(std_dev * self.periods_per_year.sqrt(), "volatility")
    }

    fn min_len(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "Volatility"
    }
}

/// Latest position of the price within its Bollinger Bands.
///
/// Not clamped; 0.5 when the band has zero width or cannot be computed.
pub fn bollinger_position(prices: &[f64], window: usize, num_std: f64) -> f64 {
    let result = BollingerBands::with_params(window, num_std)
        .latest(prices)
        .and_then(|out| ensure_finite(out.percent_b, "Bollinger position"));
    or_neutral("bollinger_position", result, 0.5)
}

/// Annualized volatility of `returns`, 0.0 when it cannot be computed.
pub fn volatility(returns: &[f64]) -> f64 {
    or_neutral("volatility", Volatility::annualized().compute(returns), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_basic() {
        let bb = BollingerBands::new();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0)
            .collect();
        let result = bb.calculate(&data);

        assert_eq!(result.len(), 11);
        for output in &result {
            assert!(output.upper > output.middle);
            assert!(output.middle > output.lower);
        }
    }

    #[test]
    fn test_bollinger_uses_sample_std() {
        // mean 2, sample std 1
        let out = BollingerBands::with_params(3, 2.0)
            .latest(&[1.0, 2.0, 3.0])
            .unwrap();

        assert!((out.middle - 2.0).abs() < 1e-12);
        assert!((out.upper - 4.0).abs() < 1e-12);
        assert!((out.lower - 0.0).abs() < 1e-12);
        // price 3 => (3 - 0) / 4
        assert!((out.percent_b - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_position_uptrend() {
        let data: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let position = bollinger_position(&data, 20, 2.0);
        assert!(position > 0.85 && position < 1.0);
    }

    #[test]
    fn test_bollinger_position_neutral_cases() {
        // Zero-width band
        assert_eq!(bollinger_position(&[100.0; 25], 20, 2.0), 0.5);
        for price in [123.456, 7.77, 0.1, 1.1, 98765.4321] {
            for n in [20, 25, 60, 200] {
                let position = bollinger_position(&vec![price; n], 20, 2.0);
                assert_eq!(position, 0.5, "{} x {}", price, n);
            }
        }
        // Too short
        assert_eq!(bollinger_position(&[1.0, 2.0, 3.0], 20, 2.0), 0.5);
        // Bad parameters
        assert_eq!(bollinger_position(&[1.0, 2.0, 3.0], 1, 2.0), 0.5);
        assert_eq!(bollinger_position(&[1.0, 2.0, 3.0], 3, f64::NAN), 0.5);
    }

    #[test]
    fn test_volatility() {
        let returns = vec![0.01, -0.01, 0.01, -0.01];
        let expected = returns.iter().std_dev() * TRADING_DAYS.sqrt();
        assert!((volatility(&returns) - expected).abs() < 1e-12);
        assert!(volatility(&returns) > 0.0);
    }

    #[test]
    fn test_volatility_neutral_cases() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[0.05]), 0.0);
        assert_eq!(volatility(&[0.0; 10]), 0.0);
        assert!(matches!(
            Volatility::annualized().compute(&[0.05]),
            Err(IndicatorError::InsufficientData {
                required: 2,
                available: 1
            })
        ));
    }
}
