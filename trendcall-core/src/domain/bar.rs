//! Bar and PriceSeries: the daily close history fed to the indicator engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One daily observation for a single symbol.
///
/// Only the close is required. The date is optional because user-supplied
/// files may carry nothing but a close column; the position in the series is
/// then the implicit index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: Option<NaiveDate>,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date: Some(date),
            close,
        }
    }

    pub fn undated(close: f64) -> Self {
        Self { date: None, close }
    }

    /// Returns true if the close is missing (NaN or infinite).
    pub fn is_void(&self) -> bool {
        !self.close.is_finite()
    }
}

/// Chronologically ascending close history for one symbol.
///
/// Construction drops void bars. If any bar carries a date, undated bars are
/// dropped too, the rest are sorted by date and duplicate dates keep their
/// first occurrence. A fully undated series keeps its input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
    dropped: usize,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        let total = bars.len();
        let mut bars: Vec<Bar> = bars.into_iter().filter(|b| !b.is_void()).collect();
        let mut dropped = total - bars.len();

        let symbol = symbol.into();
        if bars.iter().any(|b| b.date.is_some()) {
            let before = bars.len();
            bars.retain(|b| b.date.is_some());
            let undated = before - bars.len();
            if undated > 0 {
                warn!(symbol = %symbol, undated, "dropped bars without a usable date");
                dropped += undated;
            }

            bars.sort_by_key(|b| b.date);
            let before = bars.len();
            bars.dedup_by_key(|b| b.date);
            dropped += before - bars.len();
        }

        Self {
            symbol,
            bars,
            dropped,
        }
    }

    /// Build an undated series from raw closes.
    pub fn from_closes(symbol: impl Into<String>, closes: &[f64]) -> Self {
        Self::new(symbol, closes.iter().map(|&c| Bar::undated(c)).collect())
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of input bars discarded as void or duplicate.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().and_then(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().and_then(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn void_bars_are_dropped() {
        let series = PriceSeries::new(
            "TSLA",
            vec![
                Bar::undated(10.0),
                Bar::undated(f64::NAN),
                Bar::undated(11.0),
                Bar::undated(f64::INFINITY),
            ],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.dropped(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn dated_bars_are_sorted_and_deduped() {
        let series = PriceSeries::new(
            "NVDA",
            vec![
                Bar::new(d(4), 12.0),
                Bar::new(d(2), 10.0),
                Bar::new(d(3), 11.0),
                Bar::new(d(3), 99.0),
            ],
        );
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.dropped(), 1);
        assert_eq!(series.first_date(), Some(d(2)));
        assert_eq!(series.last_date(), Some(d(4)));
    }

    #[test]
    fn undated_bar_among_dated_is_dropped_and_rest_sorted() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                Bar::new(d(5), 5.0),
                Bar::undated(2.0),
                Bar::new(d(3), 3.0),
                Bar::new(d(1), 1.0),
            ],
        );
        assert_eq!(series.closes(), vec![1.0, 3.0, 5.0]);
        assert_eq!(series.dropped(), 1);
        assert_eq!(series.last_date(), Some(d(5)));
    }

    #[test]
    fn all_missing_closes_yield_empty_series() {
        let series = PriceSeries::from_closes("X", &[f64::NAN, f64::NAN]);
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
    }
}
