//! Data provider trait, fetch request and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, user CSV
//! files, synthetic series) so the pipeline never depends on a concrete one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::PriceSeries;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("{path}: no close price column")]
    MissingCloseColumn { path: PathBuf },

    #[error("{path}: {reason}")]
    FileError { path: PathBuf, reason: String },

    #[error("unsupported {what}: '{value}'")]
    Unsupported { what: &'static str, value: String },

    #[error("data error: {0}")]
    Other(String),
}

/// How far back to fetch. Mirrors the chart API's `range` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Lookback {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Lookback {
    pub const ALL: [Lookback; 7] = [
        Lookback::OneMonth,
        Lookback::ThreeMonths,
        Lookback::SixMonths,
        Lookback::OneYear,
        Lookback::TwoYears,
        Lookback::FiveYears,
        Lookback::Max,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
            Lookback::TwoYears => "2y",
            Lookback::FiveYears => "5y",
            Lookback::Max => "max",
        }
    }

    /// Approximate calendar days covered. `Max` is capped at twenty years.
    pub fn approx_days(self) -> i64 {
        match self {
            Lookback::OneMonth => 31,
            Lookback::ThreeMonths => 92,
            Lookback::SixMonths => 183,
            Lookback::OneYear => 365,
            Lookback::TwoYears => 730,
            Lookback::FiveYears => 1826,
            Lookback::Max => 7305,
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookback {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Lookback::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or(DataError::Unsupported {
                what: "period",
                value: s,
            })
    }
}

/// Bar spacing. Indicators are tuned for daily bars; the others are accepted
/// for ad-hoc use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarInterval {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl BarInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            BarInterval::Daily => "1d",
            BarInterval::Weekly => "1wk",
            BarInterval::Monthly => "1mo",
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BarInterval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(BarInterval::Daily),
            "1wk" => Ok(BarInterval::Weekly),
            "1mo" => Ok(BarInterval::Monthly),
            other => Err(DataError::Unsupported {
                what: "interval",
                value: other.to_string(),
            }),
        }
    }
}

/// What to fetch for each symbol. Defaults to six months of daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub period: Lookback,
    #[serde(default)]
    pub interval: BarInterval,
}

impl FetchRequest {
    pub fn new(period: Lookback, interval: BarInterval) -> Self {
        Self { period, interval }
    }
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the close history for a symbol.
    fn fetch(&self, symbol: &str, request: &FetchRequest) -> Result<PriceSeries, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
