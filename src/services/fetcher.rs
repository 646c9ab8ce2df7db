//! Price series retrieval with retry and provider fallback.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::{AppError, Result};
use crate::sources::{CoinCapClient, CoinGeckoClient, PriceProvider, ProviderPayload};
use crate::types::{hours_from_days, Coin, FetchedSeries, Fidelity, Granularity, PriceSeries};

/// Resolves a price series from a primary provider, falling back to a
/// secondary provider once the primary's attempts are used up.
pub struct PriceSeriesFetcher {
    primary: Arc<dyn PriceProvider>,
    secondary: Arc<dyn PriceProvider>,
    attempts: u32,
    retry_pause: Duration,
}

impl PriceSeriesFetcher {
    pub fn new(
        primary: Arc<dyn PriceProvider>,
        secondary: Arc<dyn PriceProvider>,
        attempts: u32,
        retry_pause: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            attempts: attempts.max(1),
            retry_pause,
        }
    }

    /// CoinGecko first, CoinCap as fallback.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            Arc::new(CoinGeckoClient::from_config(config)),
            Arc::new(CoinCapClient::from_config(config)),
            config.primary_attempts,
            config.retry_pause,
        )
    }

    /// Fetch a normalised series for `coin`.
    ///
    /// Returns `AllProvidersExhausted` when neither provider yields data.
    pub async fn fetch(
        &self,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<FetchedSeries> {
        let primary_error = match self.fetch_primary(coin, days, granularity).await {
            Ok(fetched) => return Ok(fetched),
            Err(e) => e,
        };

        warn!(
            "{} failed for {}, falling back to {}: {}",
            self.primary.source(),
            coin.symbol,
            self.secondary.source(),
            primary_error
        );

        match self.attempt(self.secondary.as_ref(), coin, days, granularity).await {
            Ok(fetched) => {
                info!(
                    "Using {} data for {} ({} samples, {:?})",
                    fetched.source,
                    coin.symbol,
                    fetched.series.len(),
                    fetched.fidelity
                );
                Ok(fetched)
            }
            Err(secondary_error) => Err(AppError::AllProvidersExhausted(format!(
                "{}: {}; {}: {}",
                self.primary.source(),
                primary_error,
                self.secondary.source(),
                secondary_error
            ))),
        }
    }

    async fn fetch_primary(
        &self,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<FetchedSeries> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.attempt(self.primary.as_ref(), coin, days, granularity).await {
                Ok(fetched) => {
                    debug!(
                        "{} served {} samples for {} on attempt {}",
                        fetched.source,
                        fetched.series.len(),
                        coin.symbol,
                        attempt
                    );
                    return Ok(fetched);
                }
                Err(e) => {
                    warn!(
                        "{} attempt {}/{} for {} failed: {}",
                        self.primary.source(),
                        attempt,
                        self.attempts,
                        coin.symbol,
                        e
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.retry_pause).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::ProviderUnavailable(format!("{} was not attempted", self.primary.source()))
        }))
    }

    async fn attempt(
        &self,
        provider: &dyn PriceProvider,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<FetchedSeries> {
        let source = provider.source();
        let payload = provider.fetch(coin, days, granularity).await?;

        let (series, fidelity) = match payload {
            ProviderPayload::History(samples) => {
                (PriceSeries::from_samples(samples), Fidelity::Full)
            }
            ProviderPayload::Spot(price) => {
                if !price.is_finite() || price <= 0.0 {
                    return Err(AppError::ProviderUnavailable(format!(
                        "{} spot price {} is not usable",
                        source, price
                    )));
                }
                (
                    PriceSeries::replicate_spot(price, hours_from_days(days), Utc::now()),
                    Fidelity::SpotReplicated,
                )
            }
        };

        if series.is_empty() {
            return Err(AppError::ProviderUnavailable(format!(
                "{} returned no usable prices",
                source
            )));
        }

        Ok(FetchedSeries {
            series,
            source,
            fidelity,
            degraded: source != self.primary.source(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceSample, PriceSource, COINS};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedProvider {
        source: PriceSource,
        replies: Mutex<VecDeque<Result<ProviderPayload>>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(source: PriceSource, replies: Vec<Result<ProviderPayload>>) -> Arc<Self> {
            Arc::new(Self {
                source,
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        fn source(&self) -> PriceSource {
            self.source
        }

        async fn fetch(&self, _: &Coin, _: u32, _: Granularity) -> Result<ProviderPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::ProviderUnavailable("script ended".into())))
        }
    }

    fn history(prices: &[f64]) -> ProviderPayload {
        let start = 1_700_000_000_000i64;
        ProviderPayload::History(
            prices
                .iter()
                .enumerate()
                .filter_map(|(i, p)| PriceSample::from_millis(start + i as i64 * 3_600_000, *p))
                .collect(),
        )
    }

    fn fetcher(primary: Arc<ScriptedProvider>, secondary: Arc<ScriptedProvider>) -> PriceSeriesFetcher {
        PriceSeriesFetcher::new(primary, secondary, 3, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_primary_success_is_not_degraded() {
        let primary = ScriptedProvider::new(PriceSource::CoinGecko, vec![Ok(history(&[1.0, 2.0]))]);
        let secondary = ScriptedProvider::new(PriceSource::CoinCap, vec![]);

        let fetched = fetcher(primary.clone(), secondary.clone())
            .fetch(&COINS[0], 1, Granularity::Hourly)
            .await
            .unwrap();

        assert_eq!(fetched.source, PriceSource::CoinGecko);
        assert!(!fetched.degraded);
        assert_eq!(fetched.fidelity, Fidelity::Full);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let primary = ScriptedProvider::new(
            PriceSource::CoinGecko,
            vec![
                Err(AppError::ProviderUnavailable("timeout".into())),
                Ok(history(&[1.0, 2.0, 3.0])),
            ],
        );
        let secondary = ScriptedProvider::new(PriceSource::CoinCap, vec![]);

        let fetched = fetcher(primary.clone(), secondary.clone())
            .fetch(&COINS[0], 1, Granularity::Hourly)
            .await
            .unwrap();

        assert_eq!(fetched.series.len(), 3);
        assert_eq!(primary.calls(), 2);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back_once() {
        let primary = ScriptedProvider::new(
            PriceSource::CoinGecko,
            vec![Ok(history(&[])), Ok(history(&[])), Ok(history(&[]))],
        );
        let secondary = ScriptedProvider::new(PriceSource::CoinCap, vec![Ok(ProviderPayload::Spot(42.0))]);

        let fetched = fetcher(primary.clone(), secondary.clone())
            .fetch(&COINS[0], 2, Granularity::Hourly)
            .await
            .unwrap();

        assert_eq!(primary.calls(), 3);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(fetched.source, PriceSource::CoinCap);
        assert!(fetched.degraded);
        assert_eq!(fetched.fidelity, Fidelity::SpotReplicated);
        assert_eq!(fetched.series.len(), 48);
    }

    #[tokio::test]
    async fn test_both_failing_is_exhausted() {
        let primary = ScriptedProvider::new(PriceSource::CoinGecko, vec![]);
        let secondary = ScriptedProvider::new(PriceSource::CoinCap, vec![Ok(ProviderPayload::Spot(0.0))]);

        let err = fetcher(primary.clone(), secondary.clone())
            .fetch(&COINS[0], 1, Granularity::Daily)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AllProvidersExhausted(_)));
        assert_eq!(primary.calls(), 3);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_primary_samples_are_normalised() {
        let primary = ScriptedProvider::new(
            PriceSource::CoinGecko,
            vec![Ok(history(&[-1.0, 2.0, f64::NAN, 4.0]))],
        );
        let secondary = ScriptedProvider::new(PriceSource::CoinCap, vec![]);

        let fetched = fetcher(primary, secondary)
            .fetch(&COINS[0], 1, Granularity::Hourly)
            .await
            .unwrap();

        assert_eq!(fetched.series.prices(), vec![2.0, 4.0]);
    }
}
