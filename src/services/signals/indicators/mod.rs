//! Technical indicator implementations.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volatility;

pub use bollinger::{BandPoint, BollingerBands};
pub use ema::Ema;
pub use macd::{Macd, MacdPoint};
pub use rsi::Rsi;

use crate::error::{AppError, Result};
use crate::types::{IndicatorFrame, IndicatorReport, PriceSeries};

/// Trait for implementing technical indicators over a price series.
pub trait Indicator {
    /// Value produced at each position.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Number of prices needed before the first defined value.
    fn min_periods(&self) -> usize;

    /// One entry per input price; `None` while history is insufficient.
    fn series(&self, prices: &[f64]) -> Vec<Option<Self::Output>>;
}

/// Minimum series length for any indicator to be defined.
pub const MIN_SAMPLES: usize = 2;

/// Computes the full indicator set for a price series.
pub struct IndicatorCalculator {
    rsi: Rsi,
    ema_short: Ema,
    ema_long: Ema,
    macd: Macd,
    bollinger: BollingerBands,
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self {
            rsi: Rsi::default(),
            ema_short: Ema::new(12),
            ema_long: Ema::new(26),
            macd: Macd::default(),
            bollinger: BollingerBands::default(),
        }
    }
}

impl IndicatorCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce one frame per sample plus the annualised volatility estimate.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorReport> {
        if series.len() < MIN_SAMPLES {
            return Err(AppError::InsufficientHistory(format!(
                "need at least {} price samples, got {}",
                MIN_SAMPLES,
                series.len()
            )));
        }

        let prices = series.prices();
        let rsi = self.rsi.series(&prices);
        let ema_short = self.ema_short.series(&prices);
        let ema_long = self.ema_long.series(&prices);
        let macd = self.macd.series(&prices);
        let bands = self.bollinger.series(&prices);
        let returns = volatility::log_returns(&prices);
        let volatility = volatility::annualized_volatility(&returns);

        let frames = series
            .samples()
            .iter()
            .enumerate()
            .map(|(i, sample)| IndicatorFrame {
                timestamp: sample.timestamp,
                price: sample.price,
                rsi: rsi[i],
                ema_short: ema_short[i],
                ema_long: ema_long[i],
                macd: macd[i].map(|m| m.macd),
                macd_signal: macd[i].map(|m| m.signal),
                bb_mid: bands[i].map(|b| b.mid),
                bb_upper: bands[i].map(|b| b.upper),
                bb_lower: bands[i].map(|b| b.lower),
                log_return: returns[i],
            })
            .collect();

        Ok(IndicatorReport { frames, volatility })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceSample;
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::from_samples(
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| PriceSample::new(start + Duration::hours(i as i64), *p))
                .collect(),
        )
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let err = IndicatorCalculator::new().compute(&series(&[100.0])).unwrap_err();
        assert!(matches!(err, AppError::InsufficientHistory(_)));
    }

    #[test]
    fn test_frames_parallel_to_samples() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + (i % 5) as f64).collect();
        let report = IndicatorCalculator::new().compute(&series(&prices)).unwrap();

        assert_eq!(report.frames.len(), 30);
        let first = &report.frames[0];
        assert!(first.rsi.is_none());
        assert!(first.log_return.is_none());
        assert!(first.ema_short.is_some());
        assert!(report.frames[18].bb_mid.is_none());
        assert!(report.frames[19].bb_mid.is_some());
        assert_eq!(report.latest().unwrap().price, prices[29]);
    }

    #[test]
    fn test_two_samples_define_core_indicators() {
        let report = IndicatorCalculator::new()
            .compute(&series(&[100.0, 101.0]))
            .unwrap();
        let latest = report.latest().unwrap();
        assert_eq!(latest.rsi, Some(100.0));
        assert!(latest.macd.is_some() && latest.macd_signal.is_some());
        assert!(latest.bb_upper.is_none());
        assert_eq!(report.volatility, volatility::DEFAULT_VOLATILITY);
    }

    #[test]
    fn test_tail() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let report = IndicatorCalculator::new().compute(&series(&prices)).unwrap();
        let tail = report.tail(10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[9].price, 129.0);
        assert_eq!(report.tail(100).len(), 30);
    }

    #[test]
    fn test_indicator_ids_and_min_periods() {
        let calc = IndicatorCalculator::new();
        assert_eq!(calc.rsi.id(), "rsi");
        assert_eq!(calc.macd.id(), "macd");
        assert_eq!(calc.bollinger.id(), "bollinger");
        assert_eq!(calc.bollinger.min_periods(), 20);
        assert_eq!(calc.rsi.min_periods(), MIN_SAMPLES);
    }
}
