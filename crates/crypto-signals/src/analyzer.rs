//! Market analysis pipeline.
//!
//! Computes indicators from a price history, risk statistics from its
//! returns and liquidity from depth quotes, then scores them into a signal.

use chrono::{DateTime, Utc};
use crypto_core::error::SignalError;
use crypto_core::traits::{LiquidityProvider, MetricsProvider};
use crypto_core::types::{MarketDepth, PriceSeries, TokenMetrics, TradingSignal};
use crypto_indicators as ind;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::SignalEngine;
use crate::inputs::{LiquidityMetrics, RiskMetrics, TechnicalIndicators};

/// Indicator parameters for the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Number of history points requested from the metrics provider
    pub lookback_period: usize,
    /// Annual risk-free rate for the Sharpe ratio
    pub risk_free_rate: f64,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
    pub momentum_period: usize,
    /// Confidence level for Value-at-Risk
    pub var_confidence: f64,
    /// Points spanned by the reported price change
    pub price_change_lookback: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lookback_period: 100,
            risk_free_rate: 0.03,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_std: 2.0,
            momentum_period: 14,
            var_confidence: 0.95,
            price_change_lookback: 24,
        }
    }
}

impl AnalyzerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.lookback_period == 0 {
            return Err(SignalError::InvalidConfig(
                "Lookback period must be greater than 0".into(),
            ));
        }
        if self.rsi_period == 0 || self.momentum_period == 0 {
            return Err(SignalError::InvalidConfig(
                "RSI and momentum periods must be greater than 0".into(),
            ));
        }
        if self.macd_fast == 0 || self.macd_signal == 0 || self.macd_fast >= self.macd_slow {
            return Err(SignalError::InvalidConfig(
                "MACD periods must be positive with fast < slow".into(),
            ));
        }
        if self.bollinger_window < 2 || !(self.bollinger_std >= 0.0) {
            return Err(SignalError::InvalidConfig(
                "Bollinger window must be at least 2 with a non-negative width".into(),
            ));
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(SignalError::InvalidConfig(
                "VaR confidence must be in (0, 1)".into(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(SignalError::InvalidConfig(
                "Risk-free rate must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Full analysis record for one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub token: String,
    pub price: f64,
    pub volume_24h: f64,
    /// Percent change across the configured lookback
    pub price_change_24h: f64,
    pub technical: TechnicalIndicators,
    pub risk: RiskMetrics,
    pub liquidity: LiquidityMetrics,
    pub signal: TradingSignal,
    pub timestamp: DateTime<Utc>,
}

/// Runs the indicator library and the signal engine over market data.
#[derive(Debug, Clone, Default)]
pub struct MarketAnalyzer {
    config: AnalyzerConfig,
    engine: SignalEngine,
}

impl MarketAnalyzer {
    /// Create an analyzer.
    pub fn new(config: AnalyzerConfig, engine: SignalEngine) -> Self {
        Self { config, engine }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Get the signal engine.
    pub fn engine(&self) -> &SignalEngine {
        &self.engine
    }

    /// Technical indicators over a price list.
    pub fn technical_indicators(&self, prices: &[f64]) -> TechnicalIndicators {
        let c = &self.config;
        let returns: Vec<f64> = PriceSeries::from_prices("", prices).returns();

        TechnicalIndicators {
            rsi: ind::rsi(prices, c.rsi_period),
            macd_histogram: ind::macd(prices, c.macd_fast, c.macd_slow, c.macd_signal).histogram,
            bollinger_position: ind::bollinger_position(prices, c.bollinger_window, c.bollinger_std),
            momentum: ind::momentum(prices, c.momentum_period),
            volatility: ind::volatility(&returns),
        }
    }

    /// Risk statistics over a price history and current metrics.
    pub fn risk_metrics(&self, history: &PriceSeries, metrics: &TokenMetrics) -> RiskMetrics {
        let returns = history.returns();

        RiskMetrics {
            value_at_risk: ind::value_at_risk(&returns, self.config.var_confidence),
            sharpe_ratio: ind::sharpe_ratio(&returns, self.config.risk_free_rate),
            volatility: ind::volatility(&returns),
            max_drawdown: ind::max_drawdown(&history.prices()),
            liquidity_risk: ind::liquidity_risk(metrics),
        }
    }

    /// Analyze a token from data already in hand.
    ///
    /// Errored metrics are read as zeroed; every indicator degrades to its
    /// neutral value on short or degenerate history.
    pub fn evaluate(
        &self,
        token: &str,
        history: &PriceSeries,
        metrics: &TokenMetrics,
        depth: &MarketDepth,
    ) -> MarketAnalysis {
        let metrics = metrics.effective();
        let prices = history.prices();

        let technical = self.technical_indicators(&prices);
        let risk = self.risk_metrics(history, &metrics);
        let liquidity = LiquidityMetrics::from_depth(depth);
        let signal = self.engine.evaluate(&technical, &risk, &liquidity);

        debug!(
            "{}: {} points, signal {} ({:.2})",
            token,
            prices.len(),
            signal.action,
            signal.confidence
        );

        MarketAnalysis {
            token: token.to_string(),
            price: metrics.price,
            volume_24h: metrics.volume,
            price_change_24h: ind::price_change_pct(&prices, self.config.price_change_lookback),
            technical,
            risk,
            liquidity,
            signal,
            timestamp: Utc::now(),
        }
    }

    /// Fetch market data through the collaborators and analyze a token.
    ///
    /// Provider failures are logged and replaced with unavailable metrics,
    /// an empty history or empty depth; they never abort the analysis.
    pub async fn analyze_token(
        &self,
        token: &str,
        metrics_provider: &dyn MetricsProvider,
        liquidity_provider: &dyn LiquidityProvider,
    ) -> MarketAnalysis {
        let metrics = match metrics_provider.get_metrics(token).await {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!("Metrics unavailable for {} from {}: {}", token, metrics_provider.name(), e);
                TokenMetrics::unavailable(e.to_string())
            }
        };

        let history = match metrics_provider
            .get_history(token, self.config.lookback_period)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!("History unavailable for {}: {}", token, e);
                PriceSeries::new(token)
            }
        };

        let depth = match liquidity_provider.get_depth(token).await {
            Ok(depth) => depth,
            Err(e) => {
                warn!("Depth unavailable for {} from {}: {}", token, liquidity_provider.name(), e);
                MarketDepth::new()
            }
        };

        self.evaluate(token, &history, &metrics, &depth)
    }

    /// Analyze several tokens in order. One failing token never aborts the batch.
    pub async fn analyze_tokens(
        &self,
        tokens: &[String],
        metrics_provider: &dyn MetricsProvider,
        liquidity_provider: &dyn LiquidityProvider,
    ) -> Vec<MarketAnalysis> {
        let mut analyses = Vec::with_capacity(tokens.len());
        for token in tokens {
            analyses.push(
                self.analyze_token(token, metrics_provider, liquidity_provider)
                    .await,
            );
        }
        info!("Analyzed {} tokens", analyses.len());
        analyses
    }
}
