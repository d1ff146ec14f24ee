//! Indicator trait definitions.

use crate::error::IndicatorError;

/// Trait for technical indicators.
///
/// Indicators process price data and produce derived values
/// useful for trading decisions.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically prices)
    ///
    /// # Returns
    /// A vector of indicator values, empty when there is not enough data
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        validate_series(data, self.period())
    }

    /// Most recent indicator value.
    fn latest(&self, data: &[f64]) -> Result<Self::Output, IndicatorError> {
        self.validate_data(data)?;
        self.calculate(data)
            .pop()
            .ok_or(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            })
    }
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce multiple related values.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple values.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        validate_series(data, self.period())
    }

    /// Most recent set of outputs.
    fn latest(&self, data: &[f64]) -> Result<Self::Outputs, IndicatorError> {
        self.validate_data(data)?;
        self.calculate(data)
            .pop()
            .ok_or(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            })
    }
}

/// Whole-sample statistic over a series (returns or prices).
///
/// Unlike [`Indicator`], a statistic produces one value for the entire input.
pub trait Statistic: Send + Sync {
    /// Compute the statistic.
    fn compute(&self, data: &[f64]) -> Result<f64, IndicatorError>;

    /// Minimum number of observations for a meaningful result.
    fn min_len(&self) -> usize;

    /// Get the name of the statistic.
    fn name(&self) -> &str;
}

/// Check that `data` holds at least `required` finite values.
pub fn validate_series(data: &[f64], required: usize) -> Result<(), IndicatorError> {
    if data.len() < required {
        return Err(IndicatorError::InsufficientData {
            required,
            available: data.len(),
        });
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(IndicatorError::NonFinite("input contains NaN or infinity".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestIndicator {
        period: usize,
    }

    impl Indicator for TestIndicator {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            // Simple sum indicator for testing
            data.windows(self.period).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = TestIndicator { period: 5 };

        assert!(indicator.validate_data(&[1.0, 2.0, 3.0]).is_err());
        assert!(indicator.validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
        assert!(matches!(
            indicator.validate_data(&[1.0, 2.0, f64::NAN, 4.0, 5.0]),
            Err(IndicatorError::NonFinite(_))
        ));
    }

    #[test]
    fn test_indicator_latest() {
        let indicator = TestIndicator { period: 3 };
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        assert_eq!(indicator.calculate(&data).len(), 3);
        assert!((indicator.latest(&data).unwrap() - 12.0).abs() < 0.001); // 3+4+5
        assert!(matches!(
            indicator.latest(&data[..2]),
            Err(IndicatorError::InsufficientData {
                required: 3,
                available: 2
            })
        ));
    }
}
