use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price source identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    CoinGecko,
    CoinCap,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceSource::CoinGecko => write!(f, "coingecko"),
            PriceSource::CoinCap => write!(f, "coincap"),
        }
    }
}

/// Sampling spacing of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hourly,
    Daily,
}

impl Granularity {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "1h" | "hour" => Some(Self::Hourly),
            "daily" | "1d" | "day" => Some(Self::Daily),
            _ => None,
        }
    }

    /// Value used in provider query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

/// How faithfully a fetched series reflects real market history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    /// Genuine provider history.
    Full,
    /// A single spot price copied across hourly slots.
    SpotReplicated,
}

/// One observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PriceSample {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Build from a unix millisecond timestamp. Returns None for out-of-range times.
    pub fn from_millis(timestamp_ms: i64, price: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(timestamp_ms).map(|ts| Self::new(ts, price))
    }
}

/// Ordered price samples: strictly increasing timestamps, positive finite prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    /// Normalise raw samples into a series.
    ///
    /// Drops non-finite and non-positive prices, sorts by timestamp and collapses
    /// duplicate timestamps to the last value seen.
    pub fn from_samples(mut samples: Vec<PriceSample>) -> Self {
        samples.retain(|s| s.price.is_finite() && s.price > 0.0);
        // Stable sort keeps arrival order among equal timestamps.
        samples.sort_by_key(|s| s.timestamp);

        let mut deduped: Vec<PriceSample> = Vec::with_capacity(samples.len());
        for sample in samples {
            match deduped.last_mut() {
                Some(last) if last.timestamp == sample.timestamp => *last = sample,
                _ => deduped.push(sample),
            }
        }

        Self { samples: deduped }
    }

    /// Replicate one spot price over `slots` hourly samples ending at `now`.
    pub fn replicate_spot(price: f64, slots: usize, now: DateTime<Utc>) -> Self {
        let slots = slots.max(1);
        let samples = (0..slots)
            .rev()
            .map(|i| PriceSample::new(now - Duration::hours(i as i64), price))
            .collect();
        Self::from_samples(samples)
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn prices(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.price).collect()
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Number of hourly slots covered by a lookback of `days`.
pub fn hours_from_days(days: u32) -> usize {
    (days as usize * 24).max(1)
}

/// A resolved series plus where it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedSeries {
    pub series: PriceSeries,
    pub source: PriceSource,
    pub fidelity: Fidelity,
    /// True when the series did not come from the primary provider.
    pub degraded: bool,
}
