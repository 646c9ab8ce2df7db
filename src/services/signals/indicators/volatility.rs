//! Log returns and realised volatility.

/// Periods per year used to annualise return volatility.
pub const ANNUALIZATION_PERIODS: f64 = 365.0;
/// Estimate used when there are too few returns.
pub const DEFAULT_VOLATILITY: f64 = 0.02;
/// Minimum number of returns for a real estimate.
pub const MIN_RETURNS: usize = 6;

/// `ln(p[t] / p[t-1])`; the first position is undefined.
pub fn log_returns(prices: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    if !prices.is_empty() {
        out.push(None);
    }
    out.extend(prices.windows(2).map(|w| Some((w[1] / w[0]).ln())));
    out
}

/// Annualised sample standard deviation of the defined returns.
///
/// Falls back to [`DEFAULT_VOLATILITY`] with fewer than [`MIN_RETURNS`] returns.
pub fn annualized_volatility(returns: &[Option<f64>]) -> f64 {
    let valid: Vec<f64> = returns
        .iter()
        .flatten()
        .copied()
        .filter(|r| r.is_finite())
        .collect();

    if valid.len() < MIN_RETURNS {
        return DEFAULT_VOLATILITY;
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let variance =
        valid.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;

    variance.sqrt() * ANNUALIZATION_PERIODS.sqrt()
}
