use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which the recommendation is BUY.
pub const BUY_THRESHOLD: f64 = 1.0;
/// Score at or below which the recommendation is SELL.
pub const SELL_THRESHOLD: f64 = -1.0;

/// Multiplicative weights for the weighted indicator contributions.
///
/// The Bollinger contribution is never weighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub rsi: f64,
    pub macd: f64,
    pub ema: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            rsi: 1.0,
            macd: 1.0,
            ema: 0.8,
        }
    }
}

impl WeightConfig {
    pub fn new(rsi: f64, macd: f64, ema: f64) -> Self {
        Self { rsi, macd, ema }
    }

    /// Oversold/overbought RSI only; trend indicators switched off.
    pub fn rsi_only() -> Self {
        Self {
            rsi: 1.0,
            macd: 0.0,
            ema: 0.0,
        }
    }
}

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    /// Map a score to a recommendation using the fixed ±1.0 thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= BUY_THRESHOLD {
            Recommendation::Buy
        } else if score <= SELL_THRESHOLD {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        }
    }

    /// Get display label for this recommendation.
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy now",
            Recommendation::Sell => "Consider selling / taking profit",
            Recommendation::Hold => "Wait / neutral market",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Sell => write!(f, "SELL"),
            Recommendation::Hold => write!(f, "HOLD"),
        }
    }
}

/// Signed contribution of each indicator to the score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalContributions {
    pub rsi: f64,
    pub macd: f64,
    pub ema: f64,
    pub bollinger: f64,
}

impl SignalContributions {
    pub fn total(&self) -> f64 {
        self.rsi + self.macd + self.ema + self.bollinger
    }
}

/// Weighted confidence score and the recommendation it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub score: f64,
    pub recommendation: Recommendation,
    pub contributions: SignalContributions,
}

impl SignalResult {
    pub fn from_contributions(contributions: SignalContributions) -> Self {
        let score = contributions.total();
        Self {
            score,
            recommendation: Recommendation::from_score(score),
            contributions,
        }
    }
}

/// Suggested exit levels around the current price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitLevels {
    pub take_profit: f64,
    pub stop_loss: f64,
    /// Distance to take-profit as a percentage of price.
    pub tp_pct: f64,
    /// Distance to stop-loss as a percentage of price.
    pub sl_pct: f64,
}
