//! Bollinger Bands indicator.

use super::Indicator;

/// Band values at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub mid: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev is the sample standard deviation (N-1 denominator) of the window.
/// Undefined until a full window is available.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Calculate sample standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = BandPoint;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn series(&self, prices: &[f64]) -> Vec<Option<BandPoint>> {
        let mut out = vec![None; prices.len()];
        if self.period == 0 || prices.len() < self.period {
            return out;
        }

        for (end, slot) in out.iter_mut().enumerate().skip(self.period - 1) {
            let window = &prices[end + 1 - self.period..=end];
            let mid = window.iter().sum::<f64>() / self.period as f64;
            let std_dev = Self::std_dev(window, mid);

            *slot = Some(BandPoint {
                mid,
                upper: mid + self.std_dev_multiplier * std_dev,
                lower: mid - self.std_dev_multiplier * std_dev,
            });
        }

        out
    }
}
