//! Threshold-gated alert formatting and dispatch.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use super::notifier::NotificationSink;
use crate::types::{AlertOutcome, ExitLevels, PriceSource, Recommendation};

/// Default minimum |score| for an alert.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 1.5;

/// Everything an alert message reports.
#[derive(Debug, Clone)]
pub struct AlertContext<'a> {
    pub label: &'a str,
    pub recommendation: Recommendation,
    pub price: f64,
    pub score: f64,
    pub exit_levels: ExitLevels,
    pub source: PriceSource,
    pub evaluated_at: DateTime<Utc>,
}

/// Sends alerts for strong signals. Built per evaluation.
pub struct AlertDispatcher {
    sink: Arc<dyn NotificationSink>,
    threshold: f64,
}

impl AlertDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>, threshold: f64) -> Self {
        Self { sink, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn should_alert(&self, score: f64) -> bool {
        score.abs() >= self.threshold
    }

    /// Send an alert if the score is strong enough. Sink failures are
    /// reported in the outcome, never returned as errors.
    pub async fn dispatch(&self, ctx: &AlertContext<'_>) -> AlertOutcome {
        if !self.should_alert(ctx.score) {
            return AlertOutcome::BelowThreshold {
                threshold: self.threshold,
            };
        }

        let text = format_alert(ctx);
        match self.sink.send(&text).await {
            Ok(detail) => {
                info!("Alert sent for {} ({})", ctx.label, ctx.recommendation);
                AlertOutcome::Delivered { detail }
            }
            Err(e) => {
                warn!("Alert for {} not delivered: {}", ctx.label, e);
                AlertOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// HTML alert body.
pub fn format_alert(ctx: &AlertContext<'_>) -> String {
    let levels = &ctx.exit_levels;
    format!(
        "<b>Crypto Advisor</b>\n{}\nRecommendation: {}\nPrice: {}\nScore: {:.2}\nTP~ {:.2} ({:.2}%) | SL~ {:.2} ({:.2}%)\nSource: {}\nTime: {}",
        ctx.label,
        ctx.recommendation,
        format_usd(ctx.price),
        ctx.score,
        levels.take_profit,
        levels.tp_pct,
        levels.stop_loss,
        levels.sl_pct,
        ctx.source,
        ctx.evaluated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// `$1,234.56`
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}
