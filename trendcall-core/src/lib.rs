//! TrendCall Core: indicator engine, decision composer, classifier seam, data providers.
//!
//! This crate turns a daily close history into one trade recommendation:
//! - Domain types (bars, price series, feature rows, predictions, trade records)
//! - Indicators over closes (SMA, RSI, unadjusted EWMA, MACD)
//! - Feature engine producing the latest and prior valid rows
//! - Golden-cross + RSI rule overlay combined with a binary classifier
//! - Data providers (Yahoo Finance, CSV files, synthetic)
//!
//! The core is synchronous and never reads the clock; the run date is always
//! supplied by the caller.

pub mod classifier;
pub mod data;
pub mod decision;
pub mod domain;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;

pub use classifier::{Classifier, ClassifierError};
pub use domain::{Prediction, PriceSeries, TradeRecord};
pub use features::{compute_features, feature_table, FeatureError, FeatureWindow};
pub use pipeline::{ScoreError, ScoringPipeline};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with worker threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<features::FeatureEngine>();
        require_sync::<features::FeatureEngine>();
        require_send::<pipeline::ScoringPipeline>();
        require_sync::<pipeline::ScoringPipeline>();
        require_send::<pipeline::ScoreError>();
        require_sync::<pipeline::ScoreError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::CsvProvider>();
        require_sync::<data::CsvProvider>();
        require_send::<classifier::LogisticModel>();
        require_sync::<classifier::LogisticModel>();
    }

    /// The composer stamps the caller's run date, never the clock.
    #[test]
    fn composer_is_clock_free() {
        let row = domain::FeatureRow {
            index: 20,
            date: chrono::NaiveDate::from_ymd_opt(2020, 3, 2),
            sma10: 10.0,
            sma20: 10.0,
            rsi: 50.0,
            macd: 0.0,
            macd_signal: 0.0,
            close: 10.0,
        };
        let run_date = chrono::NaiveDate::from_ymd_opt(2001, 1, 2).unwrap();
        let record = decision::compose("X", run_date, &row, &row, Prediction::Up);
        assert_eq!(record.date(), run_date);
    }
}
