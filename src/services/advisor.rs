//! One-shot evaluation pipeline: fetch, compute, score, advise, alert.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::alerts::{AlertContext, AlertDispatcher};
use super::exit_levels::suggest_exit_levels;
use super::fetcher::PriceSeriesFetcher;
use super::notifier::{NotificationSink, TelegramSink};
use super::signals::{IndicatorCalculator, SignalScorer};
use crate::config::{Config, TelegramConfig};
use crate::error::{AppError, Result};
use crate::types::{Advice, EvaluationRequest};

/// Frames included in the report.
pub const RECENT_FRAMES: usize = 10;

/// Runs evaluations. Holds no per-evaluation state.
pub struct Advisor {
    fetcher: PriceSeriesFetcher,
    calculator: IndicatorCalculator,
    telegram: TelegramConfig,
}

impl Advisor {
    pub fn new(fetcher: PriceSeriesFetcher, telegram: TelegramConfig) -> Self {
        Self {
            fetcher,
            calculator: IndicatorCalculator::new(),
            telegram,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PriceSeriesFetcher::from_config(&config.fetch),
            config.telegram.clone(),
        )
    }

    /// Evaluate a coin, alerting through a Telegram sink built for this run.
    pub async fn evaluate(&self, request: EvaluationRequest) -> Result<Advice> {
        let sink: Arc<dyn NotificationSink> = Arc::new(TelegramSink::new(&self.telegram));
        self.evaluate_with_sink(request, sink).await
    }

    /// Evaluate a coin, alerting through `sink`.
    pub async fn evaluate_with_sink(
        &self,
        request: EvaluationRequest,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Advice> {
        let evaluation_id = Uuid::new_v4();
        let span = info_span!("evaluation", id = %evaluation_id, coin = request.coin.symbol);

        let dispatcher = AlertDispatcher::new(sink, request.alert_threshold);
        self.run(evaluation_id, request, dispatcher)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        evaluation_id: Uuid,
        request: EvaluationRequest,
        dispatcher: AlertDispatcher,
    ) -> Result<Advice> {
        let coin = request.coin;

        let fetched = self
            .fetcher
            .fetch(coin, request.days, request.granularity)
            .await?;

        let report = self.calculator.compute(&fetched.series)?;
        let latest = report
            .latest()
            .ok_or_else(|| AppError::InsufficientHistory("no indicator frames".to_string()))?;

        let signal = SignalScorer::new(request.weights).score(latest)?;
        let price = latest.price;
        let levels = suggest_exit_levels(price, report.volatility, signal.recommendation);

        debug!(
            "rsi={:?} macd={:?} signal={:?} volatility={:.4}",
            latest.rsi, latest.macd, latest.macd_signal, report.volatility
        );
        info!(
            "{} {} score={:.2} price={} source={}",
            coin.symbol, signal.recommendation, signal.score, price, fetched.source
        );

        let evaluated_at = Utc::now();
        let alert = dispatcher
            .dispatch(&AlertContext {
                label: coin.label,
                recommendation: signal.recommendation,
                price,
                score: signal.score,
                exit_levels: levels,
                source: fetched.source,
                evaluated_at,
            })
            .await;

        Ok(Advice {
            evaluation_id,
            symbol: coin.symbol.to_string(),
            label: coin.label.to_string(),
            source: fetched.source,
            fidelity: fetched.fidelity,
            degraded: fetched.degraded,
            granularity: request.granularity,
            days: request.days,
            price,
            volatility: report.volatility,
            signal,
            exit_levels: request.auto_exit_levels.then_some(levels),
            recent_frames: report.tail(RECENT_FRAMES).to_vec(),
            alert,
            evaluated_at: evaluated_at.timestamp_millis(),
        })
    }
}
