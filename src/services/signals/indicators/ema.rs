//! Exponential Moving Average (EMA) indicator.

use super::Indicator;

/// Smoothing factor for a span-based EMA.
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive EMA seeded from the first value, so every position is defined.
pub fn ema_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &value in values {
        let next = match prev {
            Some(ema) => ema + alpha * (value - ema),
            None => value,
        };
        out.push(next);
        prev = Some(next);
    }

    out
}

/// EMA (Exponential Moving Average) indicator.
///
/// Gives more weight to recent prices. Seeded from the first price, so there
/// is no warm-up period.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        match self.span {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn series(&self, prices: &[f64]) -> Vec<Option<f64>> {
        ema_series(prices, span_alpha(self.span))
            .into_iter()
            .map(Some)
            .collect()
    }
}
