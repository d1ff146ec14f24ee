//! Momentum indicators.

use crypto_core::error::IndicatorError;
use crypto_core::traits::{validate_series, Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;
use crate::{ensure_finite, or_neutral};

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions. Average gain and loss are
/// simple means over the last `period` price changes.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // Only gains is maximally overbought; no movement at all is neutral
            if avg_gain > 0.0 {
                100.0
            } else {
                50.0
            }
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if self.period == 0 || data.len() <= self.period {
            return vec![];
        }

        // Calculate price changes
        let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let period_f64 = self.period as f64;

        changes
            .windows(self.period)
            .map(|window| {
                let (gain, loss) = window.iter().fold((0.0, 0.0), |(gain, loss), &change| {
                    if change > 0.0 {
                        (gain + change, loss)
                    } else {
                        (gain, loss - change)
                    }
                });
                Self::from_averages(gain / period_f64, loss / period_f64)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI period must be greater than 0".into(),
            ));
        }
        validate_series(data, self.period())
    }
}

/// MACD (Moving Average Convergence Divergence) output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: f64,
    /// Signal line (EMA of MACD)
    pub signal: f64,
    /// Histogram (MACD - Signal)
    pub histogram: f64,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Vec<MacdOutput> {
        // Calculate EMAs; both are aligned with the input
        let fast_ema = Ema::new(self.fast_period).calculate(data);
        let slow_ema = Ema::new(self.slow_period).calculate(data);

        // Calculate MACD line
        let macd_line: Vec<f64> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        // Calculate signal line (EMA of MACD)
        let signal_line = Ema::new(self.signal_period).calculate(&macd_line);

        macd_line
            .iter()
            .zip(signal_line.iter())
            .map(|(&macd, &signal)| MacdOutput {
                macd,
                signal,
                histogram: macd - signal,
            })
            .collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.fast_period == 0 || self.slow_period == 0 || self.signal_period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "MACD periods must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast period {} must be less than slow period {}",
                self.fast_period, self.slow_period
            )));
        }
        validate_series(data, self.period())
    }
}

/// Percentage change over a fixed number of steps, as a fraction.
#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
}

impl Momentum {
    /// Create a new momentum indicator.
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Momentum {
    type Output = f64;

    /// Zero base prices yield 0.0 in the full series.
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        if self.period == 0 || data.len() <= self.period {
            return vec![];
        }

        data.iter()
            .zip(&data[self.period..])
            .map(|(&base, &price)| {
                if base == 0.0 {
                    0.0
                } else {
                    (price - base) / base
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "Momentum"
    }

    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "Momentum period must be greater than 0".into(),
            ));
        }
        validate_series(data, self.period())
    }

    fn latest(&self, data: &[f64]) -> Result<f64, IndicatorError> {
        self.validate_data(data)?;
        let price = data[data.len() - 1];
        let base = data[data.len() - 1 - self.period];
        if base == 0.0 {
            return Err(IndicatorError::Degenerate("zero base price".into()));
        }
        ensure_finite((price - base) / base, "momentum")
    }
}

/// Latest RSI, 50.0 when it cannot be computed.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    let result = Rsi::new(period)
        .latest(prices)
        .and_then(|value| ensure_finite(value, "RSI"));
    or_neutral("rsi", result, 50.0)
}

/// Latest MACD values, all zero when they cannot be computed.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let result = Macd::with_periods(fast, slow, signal)
        .latest(prices)
        .and_then(|out| {
            ensure_finite(out.histogram, "MACD histogram")?;
            ensure_finite(out.macd, "MACD line")?;
            Ok(out)
        });
    or_neutral("macd", result, MacdOutput::default())
}

/// Latest momentum as a fraction, 0.0 when it cannot be computed.
pub fn momentum(prices: &[f64], period: usize) -> f64 {
    or_neutral("momentum", Momentum::new(period).latest(prices), 0.0)
}

/// Percentage change (in percent) across the last `lookback` steps.
///
/// Shorter histories measure from their first point instead; fewer than two
/// points yield 0.0.
pub fn price_change_pct(prices: &[f64], lookback: usize) -> f64 {
    let steps = lookback.min(prices.len().saturating_sub(1));
    let result = if steps == 0 {
        Err(IndicatorError::InsufficientData {
            required: 2,
            available: prices.len(),
        })
    } else {
        Momentum::new(steps).latest(prices).map(|change| change * 100.0)
    };
    or_neutral("price_change", result, 0.0)
}
