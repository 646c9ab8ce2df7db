pub mod advisor;
pub mod alerts;
pub mod exit_levels;
pub mod fetcher;
pub mod notifier;
pub mod signals;

pub use advisor::Advisor;
pub use alerts::{AlertContext, AlertDispatcher};
pub use exit_levels::suggest_exit_levels;
pub use fetcher::PriceSeriesFetcher;
pub use notifier::{NotificationSink, TelegramSink};
pub use signals::{IndicatorCalculator, SignalScorer};
