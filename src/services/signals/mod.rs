//! Trading signals service module.
//!
//! Provides technical indicator calculations and weighted composite scoring.

pub mod indicators;
pub mod scorer;

pub use indicators::{Indicator, IndicatorCalculator};
pub use scorer::SignalScorer;
