//! CoinGecko market-chart client. Primary history provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{snippet, PriceProvider, ProviderPayload};
use crate::config::FetchConfig;
use crate::error::{AppError, Result};
use crate::types::{Coin, Granularity, PriceSample, PriceSource};

const USER_AGENT: &str = "Augur/0.1 (Crypto Signal Advisor)";

/// `/coins/{id}/market_chart` response. Only prices are used.
#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

/// CoinGecko REST client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Create a new CoinGecko client.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.coingecko_api_url.clone(),
            config.coingecko_api_key.clone(),
            config.history_timeout,
        )
    }

    /// Fetch USD price history for a coin.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
        granularity: Granularity,
    ) -> Result<Vec<PriceSample>> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = days.to_string();

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", granularity.as_str()),
            ]);
        if let Some(ref key) = self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        debug!("Fetching CoinGecko market chart: {} ({} days)", coin_id, days);

        let response = request.send().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("coingecko request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("CoinGecko API returned {}: {}", status, snippet(&text));
            return Err(AppError::ProviderUnavailable(format!(
                "coingecko returned {}",
                status
            )));
        }

        let chart: MarketChart = response.json().await.map_err(|e| {
            AppError::ProviderUnavailable(format!("coingecko sent an unreadable body: {}", e))
        })?;

        let samples: Vec<PriceSample> = chart
            .prices
            .into_iter()
            .filter_map(|(ts, price)| PriceSample::from_millis(ts as i64, price))
            .collect();

        if samples.is_empty() {
            return Err(AppError::ProviderUnavailable(
                "coingecko returned no price points".to_string(),
            ));
        }

        debug!("CoinGecko returned {} points for {}", samples.len(), coin_id);
        Ok(samples)
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoClient {
    fn source(&self) -> PriceSource {
        PriceSource::CoinGecko
    }

    async fn fetch(
        &self,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<ProviderPayload> {
        self.market_chart(coin.coingecko_id, days, granularity)
            .await
            .map(ProviderPayload::History)
    }
}
