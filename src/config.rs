use std::env;
use std::time::Duration;

use crate::types::{Granularity, WeightConfig};

const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
const COINCAP_API_URL: &str = "https://api.coincap.io/v2";
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Price provider endpoints and retry policy.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// CoinGecko base URL.
    pub coingecko_api_url: String,
    /// CoinGecko API key (optional, raises rate limits).
    pub coingecko_api_key: Option<String>,
    /// CoinCap base URL.
    pub coincap_api_url: String,
    /// Attempts against the primary provider before falling back.
    pub primary_attempts: u32,
    /// Pause between primary attempts.
    pub retry_pause: Duration,
    /// Timeout for history requests.
    pub history_timeout: Duration,
    /// Timeout for spot-price requests.
    pub spot_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            coingecko_api_url: COINGECKO_API_URL.to_string(),
            coingecko_api_key: None,
            coincap_api_url: COINCAP_API_URL.to_string(),
            primary_attempts: 3,
            retry_pause: Duration::from_secs(1),
            history_timeout: Duration::from_secs(12),
            spot_timeout: Duration::from_secs(10),
        }
    }
}

/// Telegram notification settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL.
    pub api_url: String,
    /// Bot token. Missing means notifications are not configured.
    pub bot_token: Option<String>,
    /// Destination chat id.
    pub chat_id: Option<String>,
    /// Delivery timeout.
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: TELEGRAM_API_URL.to_string(),
            bot_token: None,
            chat_id: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Values used when an evaluation request leaves a setting out.
#[derive(Debug, Clone)]
pub struct EvaluationDefaults {
    /// Lookback window in days.
    pub days: u32,
    pub granularity: Granularity,
    pub weights: WeightConfig,
    /// Minimum |score| that triggers an alert.
    pub alert_threshold: f64,
    /// Suggest TP/SL levels in the report.
    pub auto_exit_levels: bool,
}

impl Default for EvaluationDefaults {
    fn default() -> Self {
        Self {
            days: 7,
            granularity: Granularity::Hourly,
            weights: WeightConfig::default(),
            alert_threshold: 1.5,
            auto_exit_levels: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub fetch: FetchConfig,
    pub telegram: TelegramConfig,
    pub defaults: EvaluationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            fetch: FetchConfig::default(),
            telegram: TelegramConfig::default(),
            defaults: EvaluationDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();

        let fetch = FetchConfig {
            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or(base.fetch.coingecko_api_url),
            coingecko_api_key: non_empty_var("COINGECKO_API_KEY"),
            coincap_api_url: env::var("COINCAP_API_URL").unwrap_or(base.fetch.coincap_api_url),
            primary_attempts: parsed_var("FETCH_ATTEMPTS")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(base.fetch.primary_attempts),
            retry_pause: parsed_var("FETCH_RETRY_PAUSE_MS")
                .map(Duration::from_millis)
                .unwrap_or(base.fetch.retry_pause),
            ..base.fetch
        };

        let telegram = TelegramConfig {
            api_url: env::var("TELEGRAM_API_URL").unwrap_or(base.telegram.api_url),
            bot_token: non_empty_var("TELEGRAM_TOKEN"),
            chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
            ..base.telegram
        };

        let weights = WeightConfig {
            rsi: parsed_var("WEIGHT_RSI").unwrap_or(base.defaults.weights.rsi),
            macd: parsed_var("WEIGHT_MACD").unwrap_or(base.defaults.weights.macd),
            ema: parsed_var("WEIGHT_EMA").unwrap_or(base.defaults.weights.ema),
        };

        let defaults = EvaluationDefaults {
            days: parsed_var("DEFAULT_DAYS").unwrap_or(base.defaults.days),
            granularity: env::var("DEFAULT_INTERVAL")
                .ok()
                .and_then(|v| Granularity::from_str(&v))
                .unwrap_or(base.defaults.granularity),
            weights,
            alert_threshold: parsed_var("ALERT_THRESHOLD")
                .unwrap_or(base.defaults.alert_threshold),
            auto_exit_levels: parsed_var("AUTO_TP_SL").unwrap_or(base.defaults.auto_exit_levels),
        };

        Self {
            host: env::var("HOST").unwrap_or(base.host),
            port: parsed_var("PORT").unwrap_or(base.port),
            fetch,
            telegram,
            defaults,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
