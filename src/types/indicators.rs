use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived indicators for one price sample.
///
/// Fields that need more history than is available at this point of the
/// series are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorFrame {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub rsi: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub log_return: Option<f64>,
}

/// Indicator frames for a whole series plus its volatility estimate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReport {
    pub frames: Vec<IndicatorFrame>,
    /// Annualised standard deviation of log returns.
    pub volatility: f64,
}

impl IndicatorReport {
    pub fn latest(&self) -> Option<&IndicatorFrame> {
        self.frames.last()
    }

    /// The last `n` frames, oldest first.
    pub fn tail(&self, n: usize) -> &[IndicatorFrame] {
        let start = self.frames.len().saturating_sub(n);
        &self.frames[start..]
    }
}
