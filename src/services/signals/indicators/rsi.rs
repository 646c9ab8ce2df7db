//! Relative Strength Index (RSI) indicator.

use super::Indicator;

/// RSI (Relative Strength Index) indicator.
///
/// Wilder-style smoothing: gains and losses of successive price differences
/// are averaged exponentially with `alpha = 1 / period`. Values range 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// With no losses RSI is 100; with neither gains nor losses it is 50.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    fn alpha(&self) -> f64 {
        1.0 / self.period as f64
    }

    /// RSI from smoothed average gain and loss.
    pub fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                return 50.0;
            }
            return 100.0;
        }

        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn series(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(prices.len());
        let mut averages: Option<(f64, f64)> = None;

        if !prices.is_empty() {
            out.push(None);
        }

        for pair in prices.windows(2) {
            let change = pair[1] - pair[0];
            let gain = change.max(0.0);
            let loss = (-change).max(0.0);

            let (avg_gain, avg_loss) = match averages {
                Some((g, l)) => (g + alpha * (gain - g), l + alpha * (loss - l)),
                None => (gain, loss),
            };
            averages = Some((avg_gain, avg_loss));

            out.push(Some(Self::from_averages(avg_gain, avg_loss)));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 100.0 + i as f64 * 1.5).collect()
    }

    fn downtrend(count: usize) -> Vec<f64> {
        (0..count).map(|i| 200.0 - i as f64 * 1.5).collect()
    }

    #[test]
    fn test_rsi_first_point_undefined() {
        let out = Rsi::default().series(&uptrend(5));
        assert_eq!(out.len(), 5);
        assert!(out[0].is_none());
        assert!(out[1..].iter().all(|v| v.is_some()));
    }

    #[test]
    fn test_rsi_strict_uptrend_is_100() {
        let out = Rsi::default().series(&uptrend(50));
        assert_eq!(out.last().unwrap().unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_strict_downtrend_is_0() {
        let out = Rsi::default().series(&downtrend(50));
        assert_eq!(out.last().unwrap().unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_is_50() {
        let out = Rsi::default().series(&[50.0; 40]);
        assert!(out[1..].iter().all(|v| *v == Some(50.0)));
    }

    #[test]
    fn test_rsi_value_range() {
        let prices = [100.0, 103.0, 101.0, 104.0, 99.0, 102.0, 98.0, 105.0];
        for value in Rsi::default().series(&prices).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_from_averages() {
        assert_eq!(Rsi::from_averages(0.0, 0.0), 50.0);
        assert_eq!(Rsi::from_averages(1.0, 0.0), 100.0);
        assert_eq!(Rsi::from_averages(0.0, 1.0), 0.0);
        assert!((Rsi::from_averages(1.0, 1.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_rsi_custom_period() {
        let rsi = Rsi::new(7);
        assert!((rsi.alpha() - 1.0 / 7.0).abs() < 1e-15);
        assert_eq!(rsi.id(), "rsi");
    }
}
