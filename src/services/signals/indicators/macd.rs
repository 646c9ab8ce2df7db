//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::{ema_series, span_alpha};
use super::Indicator;

/// MACD line and its signal line at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
}

impl MacdPoint {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
///
/// All EMAs are seeded from their first input, so every point is defined.
pub struct Macd {
    fast_span: usize,
    slow_span: usize,
    signal_span: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_span: 12,
            slow_span: 26,
            signal_span: 9,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdPoint;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn series(&self, prices: &[f64]) -> Vec<Option<MacdPoint>> {
        let fast = ema_series(prices, span_alpha(self.fast_span));
        let slow = ema_series(prices, span_alpha(self.slow_span));

        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = ema_series(&macd_line, span_alpha(self.signal_span));

        macd_line
            .into_iter()
            .zip(signal_line)
            .map(|(macd, signal)| Some(MacdPoint { macd, signal }))
            .collect()
    }
}
