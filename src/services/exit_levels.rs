//! Volatility-scaled take-profit / stop-loss suggestions.

use crate::types::{ExitLevels, Recommendation};

/// Trading days used to de-annualise volatility.
pub const TRADING_DAYS: f64 = 252.0;
/// Daily volatility assumed when no usable estimate exists.
pub const DEFAULT_DAILY_VOL: f64 = 0.02;

/// Suggest exit levels around `price` from an annualised volatility estimate.
///
/// BUY places the stop one daily deviation below and the target two above;
/// SELL mirrors that. HOLD uses one deviation either side. Levels never go
/// below zero.
pub fn suggest_exit_levels(
    price: f64,
    annual_volatility: f64,
    recommendation: Recommendation,
) -> ExitLevels {
    let daily_vol = if annual_volatility > 0.0 && annual_volatility.is_finite() {
        annual_volatility / TRADING_DAYS.sqrt()
    } else {
        DEFAULT_DAILY_VOL
    };
    let price_std = price * daily_vol;

    let (stop_loss, take_profit) = match recommendation {
        Recommendation::Buy => ((price - price_std).max(0.0), price + 2.0 * price_std),
        Recommendation::Sell => (price + price_std, (price - 2.0 * price_std).max(0.0)),
        Recommendation::Hold => ((price - price_std).max(0.0), price + price_std),
    };

    let (sl_pct, tp_pct) = if price > 0.0 {
        (
            (price - stop_loss) / price * 100.0,
            (take_profit - price) / price * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    ExitLevels {
        take_profit,
        stop_loss,
        tp_pct,
        sl_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_buy_levels() {
        let annual = 0.5;
        let std = 100.0 * annual / 252f64.sqrt();
        let levels = suggest_exit_levels(100.0, annual, Recommendation::Buy);
        assert!(close(levels.stop_loss, 100.0 - std));
        assert!(close(levels.take_profit, 100.0 + 2.0 * std));
        assert!(levels.stop_loss < 100.0 && 100.0 < levels.take_profit);
        assert!(close(levels.tp_pct, 2.0 * levels.sl_pct));
    }

    #[test]
    fn test_sell_levels_are_mirrored() {
        let levels = suggest_exit_levels(100.0, 0.5, Recommendation::Sell);
        assert!(levels.take_profit < 100.0 && 100.0 < levels.stop_loss);
        // percentages are signed relative to price
        assert!(levels.sl_pct < 0.0);
        assert!(levels.tp_pct < 0.0);
    }

    #[test]
    fn test_hold_is_symmetric() {
        let levels = suggest_exit_levels(100.0, 0.5, Recommendation::Hold);
        assert!(close(100.0 - levels.stop_loss, levels.take_profit - 100.0));
    }

    #[test]
    fn test_zero_volatility_uses_default() {
        let levels = suggest_exit_levels(50.0, 0.0, Recommendation::Hold);
        assert!(close(levels.stop_loss, 49.0));
        assert!(close(levels.take_profit, 51.0));
        assert!(close(levels.sl_pct, 2.0));
        assert!(close(levels.tp_pct, 2.0));
    }

    #[test]
    fn test_levels_never_negative() {
        let levels = suggest_exit_levels(10.0, 100.0, Recommendation::Sell);
        assert_eq!(levels.take_profit, 0.0);
        let levels = suggest_exit_levels(10.0, 100.0, Recommendation::Buy);
        assert_eq!(levels.stop_loss, 0.0);
    }

    #[test]
    fn test_zero_price() {
        let levels = suggest_exit_levels(0.0, 0.5, Recommendation::Buy);
        assert_eq!(levels.sl_pct, 0.0);
        assert_eq!(levels.tp_pct, 0.0);
    }
}
