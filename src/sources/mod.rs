//! Market data providers.

pub mod coincap;
pub mod coingecko;

pub use coincap::CoinCapClient;
pub use coingecko::CoinGeckoClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Coin, Granularity, PriceSample, PriceSource};

/// Shape of a provider answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// Historical samples, in provider order.
    History(Vec<PriceSample>),
    /// A single current price.
    Spot(f64),
}

/// A source of USD price data for a coin.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Which provider this is.
    fn source(&self) -> PriceSource;

    /// Fetch prices covering the last `days` at `granularity`.
    async fn fetch(
        &self,
        coin: &Coin,
        days: u32,
        granularity: Granularity,
    ) -> Result<ProviderPayload>;
}

/// Trim a provider error body for logging.
pub(crate) fn snippet(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
