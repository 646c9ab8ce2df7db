//! Weighted multi-indicator scoring.

use crate::error::{AppError, Result};
use crate::types::{IndicatorFrame, SignalContributions, SignalResult, WeightConfig};

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

const RSI_MAGNITUDE: f64 = 1.0;
const MACD_BULLISH: f64 = 1.0;
const MACD_BEARISH: f64 = -0.8;
const EMA_MAGNITUDE: f64 = 0.6;
const BOLLINGER_MAGNITUDE: f64 = 0.5;

/// Turns the latest indicator frame into a signed confidence score.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalScorer {
    weights: WeightConfig,
}

impl SignalScorer {
    pub fn new(weights: WeightConfig) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> WeightConfig {
        self.weights
    }

    /// Score a frame. Fails if RSI, either EMA, MACD or its signal is undefined.
    pub fn score(&self, frame: &IndicatorFrame) -> Result<SignalResult> {
        let rsi = required(frame.rsi, "rsi")?;
        let ema_short = required(frame.ema_short, "ema_short")?;
        let ema_long = required(frame.ema_long, "ema_long")?;
        let macd = required(frame.macd, "macd")?;
        let macd_signal = required(frame.macd_signal, "macd_signal")?;

        let rsi_contribution = if rsi < RSI_OVERSOLD {
            RSI_MAGNITUDE * self.weights.rsi
        } else if rsi > RSI_OVERBOUGHT {
            -RSI_MAGNITUDE * self.weights.rsi
        } else {
            0.0
        };

        // Exact ties carry no trend information and score 0.
        let macd_contribution = if macd > macd_signal {
            MACD_BULLISH * self.weights.macd
        } else if macd < macd_signal {
            MACD_BEARISH * self.weights.macd
        } else {
            0.0
        };

        let ema_contribution = if ema_short > ema_long {
            EMA_MAGNITUDE * self.weights.ema
        } else if ema_short < ema_long {
            -EMA_MAGNITUDE * self.weights.ema
        } else {
            0.0
        };

        Ok(SignalResult::from_contributions(SignalContributions {
            rsi: rsi_contribution,
            macd: macd_contribution,
            ema: ema_contribution,
            bollinger: bollinger_contribution(frame),
        }))
    }
}

/// ±0.5 outside the bands, 0 inside or while the bands are undefined.
fn bollinger_contribution(frame: &IndicatorFrame) -> f64 {
    match (frame.bb_lower, frame.bb_upper) {
        (Some(lower), _) if frame.price < lower => BOLLINGER_MAGNITUDE,
        (Some(_), Some(upper)) if frame.price > upper => -BOLLINGER_MAGNITUDE,
        _ => 0.0,
    }
}

fn required(value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| {
        AppError::InsufficientHistory(format!("{} is not yet available", field))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Recommendation;
    use chrono::Utc;

    fn frame(rsi: f64, macd: f64, signal: f64, short: f64, long: f64) -> IndicatorFrame {
        IndicatorFrame {
            timestamp: Utc::now(),
            price: 100.0,
            rsi: Some(rsi),
            ema_short: Some(short),
            ema_long: Some(long),
            macd: Some(macd),
            macd_signal: Some(signal),
            bb_mid: None,
            bb_upper: None,
            bb_lower: None,
            log_return: None,
        }
    }

    #[test]
    fn test_all_bullish() {
        let result = SignalScorer::default()
            .score(&frame(25.0, 1.0, 0.5, 101.0, 100.0))
            .unwrap();
        assert_eq!(result.contributions.rsi, 1.0);
        assert_eq!(result.contributions.macd, 1.0);
        assert!((result.contributions.ema - 0.48).abs() < 1e-12);
        assert_eq!(result.contributions.bollinger, 0.0);
        assert_eq!(result.recommendation, Recommendation::Buy);
    }

    #[test]
    fn test_all_bearish() {
        let result = SignalScorer::default()
            .score(&frame(80.0, 0.1, 0.5, 99.0, 100.0))
            .unwrap();
        assert!((result.score - (-1.0 - 0.8 - 0.48)).abs() < 1e-12);
        assert_eq!(result.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_bearish_trend() {
        let result = SignalScorer::default()
            .score(&frame(50.0, 0.4, 0.5, 99.0, 100.0))
            .unwrap();
        assert_eq!(result.contributions.macd, -0.8);
        assert!((result.contributions.ema + 0.48).abs() < 1e-12);
        assert_eq!(result.recommendation, Recommendation::Sell);
    }

    #[test]
    fn test_ties_are_neutral() {
        let result = SignalScorer::default()
            .score(&frame(50.0, 0.0, 0.0, 50.0, 50.0))
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.recommendation, Recommendation::Hold);
    }

    #[test]
    fn test_rsi_bounds_are_exclusive() {
        let scorer = SignalScorer::default();
        assert_eq!(scorer.score(&frame(30.0, 1.0, 0.0, 1.0, 0.0)).unwrap().contributions.rsi, 0.0);
        assert_eq!(scorer.score(&frame(70.0, 1.0, 0.0, 1.0, 0.0)).unwrap().contributions.rsi, 0.0);
    }

    #[test]
    fn test_bollinger_only_when_defined() {
        let mut f = frame(50.0, 1.0, 0.0, 1.0, 0.0);
        f.price = 90.0;
        assert_eq!(bollinger_contribution(&f), 0.0);

        f.bb_lower = Some(95.0);
        f.bb_upper = Some(105.0);
        assert_eq!(bollinger_contribution(&f), 0.5);

        f.price = 110.0;
        assert_eq!(bollinger_contribution(&f), -0.5);

        f.price = 100.0;
        assert_eq!(bollinger_contribution(&f), 0.0);
    }

    #[test]
    fn test_missing_field_is_insufficient_history() {
        let mut f = frame(50.0, 1.0, 0.0, 1.0, 0.0);
        f.rsi = None;
        let err = SignalScorer::default().score(&f).unwrap_err();
        assert!(matches!(err, AppError::InsufficientHistory(msg) if msg.contains("rsi")));
    }

    #[test]
    fn test_rsi_only_preset() {
        let result = SignalScorer::new(WeightConfig::rsi_only())
            .score(&frame(20.0, -1.0, 0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(result.score, 1.0);
        assert_eq!(result.recommendation, Recommendation::Buy);
    }
}
