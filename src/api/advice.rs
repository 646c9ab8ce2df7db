//! Advice API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::config::EvaluationDefaults;
use crate::error::{AppError, Result};
use crate::types::{Advice, Coin, EvaluationRequest, Granularity, WeightConfig, COINS};
use crate::AppState;

/// Longest lookback accepted.
pub const MAX_DAYS: u32 = 365;

/// API response wrapper.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn new(data: T) -> Self {
        Self { data }
    }
}

/// Query parameters for the advice endpoint. Anything omitted falls back to
/// the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct AdviceQuery {
    pub days: Option<u32>,
    /// hourly or daily
    pub interval: Option<String>,
    pub weight_rsi: Option<f64>,
    pub weight_macd: Option<f64>,
    pub weight_ema: Option<f64>,
    pub alert_threshold: Option<f64>,
    pub auto_tp_sl: Option<bool>,
}

/// Create the advice router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coins", get(list_coins))
        .route("/advice/:coin", get(get_advice))
}

/// List supported coins.
async fn list_coins() -> Json<ApiResponse<Vec<Coin>>> {
    Json(ApiResponse::new(COINS.to_vec()))
}

/// Run one evaluation for a coin.
async fn get_advice(
    State(state): State<AppState>,
    Path(coin): Path<String>,
    Query(query): Query<AdviceQuery>,
) -> Result<Json<ApiResponse<Advice>>> {
    let coin = Coin::find(&coin)
        .ok_or_else(|| AppError::NotFound(format!("Unknown coin: {}", coin)))?;
    let request = build_request(&state.config.defaults, coin, query)?;

    let advice = state.advisor.evaluate(request).await?;
    Ok(Json(ApiResponse::new(advice)))
}

/// Merge query overrides with defaults and range-check the result.
pub fn build_request(
    defaults: &EvaluationDefaults,
    coin: &'static Coin,
    query: AdviceQuery,
) -> Result<EvaluationRequest> {
    let days = query.days.unwrap_or(defaults.days);
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {}",
            MAX_DAYS
        )));
    }

    let granularity = match query.interval.as_deref() {
        Some(raw) => Granularity::from_str(raw).ok_or_else(|| {
            AppError::BadRequest(format!("interval must be hourly or daily, got {}", raw))
        })?,
        None => defaults.granularity,
    };

    let weights = WeightConfig::new(
        query.weight_rsi.unwrap_or(defaults.weights.rsi),
        query.weight_macd.unwrap_or(defaults.weights.macd),
        query.weight_ema.unwrap_or(defaults.weights.ema),
    );
    for (name, value) in [("rsi", weights.rsi), ("macd", weights.macd), ("ema", weights.ema)] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::BadRequest(format!(
                "weight_{} must be a non-negative number",
                name
            )));
        }
    }

    let alert_threshold = query.alert_threshold.unwrap_or(defaults.alert_threshold);
    if !alert_threshold.is_finite() || alert_threshold <= 0.0 {
        return Err(AppError::BadRequest(
            "alert_threshold must be positive".to_string(),
        ));
    }

    Ok(EvaluationRequest {
        coin,
        days,
        granularity,
        weights,
        alert_threshold,
        auto_exit_levels: query.auto_tp_sl.unwrap_or(defaults.auto_exit_levels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc() -> &'static Coin {
        Coin::find("btc").unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let request = build_request(&EvaluationDefaults::default(), btc(), AdviceQuery::default())
            .unwrap();
        assert_eq!(request.days, 7);
        assert_eq!(request.granularity, Granularity::Hourly);
        assert_eq!(request.weights, WeightConfig::default());
        assert_eq!(request.alert_threshold, 1.5);
        assert!(request.auto_exit_levels);
    }

    #[test]
    fn test_overrides() {
        let query = AdviceQuery {
            days: Some(30),
            interval: Some("daily".to_string()),
            weight_rsi: Some(2.0),
            auto_tp_sl: Some(false),
            ..Default::default()
        };
        let request = build_request(&EvaluationDefaults::default(), btc(), query).unwrap();
        assert_eq!(request.days, 30);
        assert_eq!(request.granularity, Granularity::Daily);
        assert_eq!(request.weights.rsi, 2.0);
        assert_eq!(request.weights.macd, 1.0);
        assert!(!request.auto_exit_levels);
    }

    #[test]
    fn test_range_checks() {
        let defaults = EvaluationDefaults::default();
        let cases = [
            AdviceQuery { days: Some(0), ..Default::default() },
            AdviceQuery { days: Some(366), ..Default::default() },
            AdviceQuery { interval: Some("weekly".into()), ..Default::default() },
            AdviceQuery { weight_macd: Some(-0.1), ..Default::default() },
            AdviceQuery { alert_threshold: Some(0.0), ..Default::default() },
        ];
        for query in cases {
            let err = build_request(&defaults, btc(), query).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn test_zero_weights_allowed() {
        let query = AdviceQuery {
            weight_macd: Some(0.0),
            weight_ema: Some(0.0),
            ..Default::default()
        };
        let request = build_request(&EvaluationDefaults::default(), btc(), query).unwrap();
        assert_eq!(request.weights, WeightConfig::rsi_only());
    }
}
