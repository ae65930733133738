//! Domain types for TrendCall

pub mod bar;
pub mod feature;
pub mod prediction;
pub mod record;

pub use bar::{Bar, PriceSeries};
pub use feature::{FeatureRow, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use prediction::Prediction;
pub use record::{ActionLabel, StrategyNote, TradeRecord, TradeStatus, RECORD_COLUMNS};
