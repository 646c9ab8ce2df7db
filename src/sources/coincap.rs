//! CoinCap.io API client.
//!
//! CoinCap provides free, no-API-key-required access to crypto data.
//! Used as a fallback when CoinGecko is unavailable.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{snippet, PriceProvider, ProviderPayload};
use crate::config::FetchConfig;
use crate::error::{AppError, Result};
use crate::types::{hours_from_days, Coin, Granularity, PriceSample, PriceSource};

#[derive(Debug, Deserialize)]
struct CoinCapResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinCapHistoryPoint {
    price_usd: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinCapAsset {
    price_usd: Option<String>,
}

/// CoinCap REST client.
#[derive(Clone)]
pub struct CoinCapClient {
    client: Client,
    base_url: String,
    history_timeout: Duration,
    spot_timeout: Duration,
}

impl CoinCapClient {
    /// Create a new CoinCap client.
    pub fn new(base_url: impl Into<String>, history_timeout: Duration, spot_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            history_timeout,
            spot_timeout,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.coincap_api_url.clone(),
            config.history_timeout,
            config.spot_timeout,
        )
    }

    /// Daily history for an asset, keeping at most the last `limit` entries.
    pub async fn daily_history(&self, asset_id: &str, limit: usize) -> Result<Vec<PriceSample>> {
        let url = format!("{}/assets/{}/history", self.base_url, asset_id);
        let end = Utc::now().timestamp_millis().to_string();

        debug!("Fetching CoinCap daily history: {}", asset_id);

        let request = self
            .client
            .get(&url)
            .timeout(self.history_timeout)
            .query(&[("interval", "d1"), ("start", "0"), ("end", end.as_str())]);
        let points: Vec<CoinCapHistoryPoint> = self.send(request).await?;

        let skip = points.len().saturating_sub(limit);
        let samples: Vec<PriceSample> = points
            .into_iter()
            .skip(skip)
            .filter_map(|p| {
                let price = p.price_usd?.parse::<f64>().ok()?;
                PriceSample::from_millis(p.time?, price)
            })
            .collect();

        if samples.is_empty() {
            return Err(AppError::ProviderUnavailable(
                "coincap history is empty".to_string(),
            ));
        }

        debug!("CoinCap returned {} daily points for {}", samples.len(), asset_id);
        Ok(samples)
    }

    /// Current USD price for an asset.
    pub async fn spot_price(&self, asset_id: &str) -> Result<f64> {
        let url = format!("{}/assets/{}", self.base_url, asset_id);

        debug!("Fetching CoinCap spot price: {}", asset_id);

        let request = self.client.get(&url).timeout(self.spot_timeout);
        let asset: CoinCapAsset = self.send(request).await?;

        let price = asset
            .price_usd
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);

        if !price.is_finite() || price <= 0.0 {
            return Err(AppError::ProviderUnavailable(format!(
                "coincap spot price for {} is not usable",
                asset_id
            )));
        }

        Ok(price)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("coincap request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("CoinCap API error: {} - {}", status, snippet(&text));
            return Err(AppError::ProviderUnavailable(format!(
                "coincap returned {}",
                status
            )));
        }

        let body: CoinCapResponse<T> = response.json().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("coincap sent an unreadable body: {}", e))
        })?;
        Ok(body.data)
    }
}

#[async_trait]
impl PriceProvider for CoinCapClient {
    fn source(&self) -> PriceSource {
        PriceSource::CoinCap
    }

    /// Daily requests use real history; hourly requests, or a failed history
    /// call, fall back to the spot price.
    async fn fetch(
        &self,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<ProviderPayload> {
        if granularity == Granularity::Daily {
            match self.daily_history(coin.coincap_id, hours_from_days(days)).await {
                Ok(samples) => return Ok(ProviderPayload::History(samples)),
                Err(e) => warn!("CoinCap history unavailable for {}, using spot: {}", coin.symbol, e),
            }
        }

        self.spot_price(coin.coincap_id)
            .await
            .map(ProviderPayload::Spot)
    }
}
