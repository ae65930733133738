//! Dataset fingerprinting.
//!
//! A `DatasetHash` identifies the exact close history a record was scored
//! from, so two runs can be compared without keeping the raw data around.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::PriceSeries;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// First 12 hex digits, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// BLAKE3 over symbol, dates and close bit patterns.
pub fn dataset_hash(series: &PriceSeries) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    hasher.update(&(series.len() as u64).to_le_bytes());
    for bar in series.bars() {
        match bar.date {
            Some(date) => hasher.update(date.to_string().as_bytes()),
            None => hasher.update(b"-"),
        };
        hasher.update(&bar.close.to_bits().to_le_bytes());
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}
