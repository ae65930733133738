//! Feature rows and the ordered feature vector handed to the classifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of features in the classifier input.
pub const FEATURE_COUNT: usize = 6;

/// Feature names in classifier input order.
///
/// The model was trained on exactly this order; reordering silently corrupts
/// predictions.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["RSI", "MACD", "MACD_signal", "SMA10", "SMA20", "Close"];

/// Indicator values for one bar on which every indicator is defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Position of the bar in its price series.
    pub index: usize,
    pub date: Option<NaiveDate>,
    pub sma10: f64,
    pub sma20: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub close: f64,
}

impl FeatureRow {
    /// True if every indicator column holds a finite value.
    pub fn is_complete(&self) -> bool {
        [
            self.sma10,
            self.sma20,
            self.rsi,
            self.macd,
            self.macd_signal,
            self.close,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector([
            self.rsi,
            self.macd,
            self.macd_signal,
            self.sma10,
            self.sma20,
            self.close,
        ])
    }
}

/// `[RSI, MACD, MACD_signal, SMA10, SMA20, Close]` for the latest valid row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Name/value pairs in input order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }

    /// First non-finite feature, if any.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        self.named().find(|(_, v)| !v.is_finite())
    }

    pub fn to_f32(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
