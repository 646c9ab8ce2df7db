use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    Coin, ExitLevels, Fidelity, Granularity, IndicatorFrame, PriceSource, SignalResult,
    WeightConfig,
};

/// Everything a single "evaluate now" run needs, passed in as plain values.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub coin: &'static Coin,
    pub days: u32,
    pub granularity: Granularity,
    pub weights: WeightConfig,
    pub alert_threshold: f64,
    /// Include suggested TP/SL in the report.
    pub auto_exit_levels: bool,
}

/// What happened to the alert for an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// |score| stayed under the threshold; nothing was sent.
    BelowThreshold { threshold: f64 },
    /// The sink accepted the message.
    Delivered { detail: String },
    /// The sink was not configured or refused the message.
    Failed { reason: String },
}

impl AlertOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, AlertOutcome::Delivered { .. })
    }

    pub fn was_attempted(&self) -> bool {
        !matches!(self, AlertOutcome::BelowThreshold { .. })
    }
}

/// Result of one evaluation, ready for presentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub evaluation_id: Uuid,
    pub symbol: String,
    pub label: String,
    pub source: PriceSource,
    pub fidelity: Fidelity,
    pub degraded: bool,
    pub granularity: Granularity,
    pub days: u32,
    pub price: f64,
    /// Annualised volatility estimate.
    pub volatility: f64,
    pub signal: SignalResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_levels: Option<ExitLevels>,
    /// Most recent indicator frames, oldest first.
    pub recent_frames: Vec<IndicatorFrame>,
    pub alert: AlertOutcome,
    /// Unix timestamp (milliseconds) when evaluated.
    pub evaluated_at: i64,
}
