//! Indicator engine: close series → feature rows → latest/prior window.
//!
//! All indicator columns are computed over the whole series first; rows where
//! any column is still undefined are then dropped. Nothing is imputed, so the
//! first valid row of a daily series sits at index 19 (SMA20 binds).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FeatureRow, PriceSeries};
use crate::indicators::{Indicator, Macd, Rsi, Sma};

/// Valid rows needed to score a ticker: one latest plus one prior for the
/// crossover test.
pub const MIN_VALID_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("{symbol}: no usable close prices")]
    MissingClose { symbol: String },

    #[error("{symbol}: {valid_rows} valid feature rows, need at least {required}")]
    InsufficientHistory {
        symbol: String,
        valid_rows: usize,
        required: usize,
    },
}

/// The two most recent valid rows of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureWindow {
    pub latest: FeatureRow,
    pub prior: FeatureRow,
    /// Total valid rows in the series.
    pub valid_rows: usize,
}

/// Fixed set of indicators producing the classifier's feature columns.
#[derive(Debug, Clone)]
pub struct FeatureEngine {
    sma_fast: Sma,
    sma_slow: Sma,
    rsi: Rsi,
    macd: Macd,
    macd_signal: Macd,
}

impl FeatureEngine {
    /// SMA10, SMA20, RSI14, MACD(12, 26) and signal(9).
    pub fn standard() -> Self {
        Self {
            sma_fast: Sma::new(10),
            sma_slow: Sma::new(20),
            rsi: Rsi::new(14),
            macd: Macd::line(12, 26),
            macd_signal: Macd::signal(12, 26, 9),
        }
    }

    /// Longest warm-up among the engine's indicators.
    pub fn warmup(&self) -> usize {
        self.indicators()
            .iter()
            .map(|ind| ind.lookback())
            .max()
            .unwrap_or(0)
    }

    fn indicators(&self) -> [&dyn Indicator; 5] {
        [
            &self.sma_fast,
            &self.sma_slow,
            &self.rsi,
            &self.macd,
            &self.macd_signal,
        ]
    }

    /// Every valid feature row, oldest first.
    pub fn table(&self, series: &PriceSeries) -> Result<Vec<FeatureRow>, FeatureError> {
        if series.is_empty() {
            return Err(FeatureError::MissingClose {
                symbol: series.symbol().to_string(),
            });
        }

        let closes = series.closes();
        let sma10 = self.sma_fast.compute(&closes);
        let sma20 = self.sma_slow.compute(&closes);
        let rsi = self.rsi.compute(&closes);
        let macd = self.macd.compute(&closes);
        let signal = self.macd_signal.compute(&closes);

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| FeatureRow {
                index: i,
                date: bar.date,
                sma10: sma10[i],
                sma20: sma20[i],
                rsi: rsi[i],
                macd: macd[i],
                macd_signal: signal[i],
                close: bar.close,
            })
            .filter(FeatureRow::is_complete)
            .collect();

        Ok(rows)
    }

    /// Latest and prior valid rows.
    pub fn compute(&self, series: &PriceSeries) -> Result<FeatureWindow, FeatureError> {
        let rows = self.table(series)?;
        let valid_rows = rows.len();

        match rows.as_slice() {
            [.., prior, latest] => Ok(FeatureWindow {
                latest: *latest,
                prior: *prior,
                valid_rows,
            }),
            _ => Err(FeatureError::InsufficientHistory {
                symbol: series.symbol().to_string(),
                valid_rows,
                required: MIN_VALID_ROWS,
            }),
        }
    }
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Latest/prior window using the standard engine.
pub fn compute_features(series: &PriceSeries) -> Result<FeatureWindow, FeatureError> {
    FeatureEngine::standard().compute(series)
}

/// All valid rows using the standard engine.
pub fn feature_table(series: &PriceSeries) -> Result<Vec<FeatureRow>, FeatureError> {
    FeatureEngine::standard().table(series)
}

impl FeatureWindow {
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.latest.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn rising(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        PriceSeries::from_closes("TEST", &closes)
    }

    #[test]
    fn first_valid_row_is_index_19() {
        let rows = feature_table(&rising(25)).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].index, 19);
        assert_eq!(rows.last().unwrap().index, 24);
    }

    #[test]
    fn warmup_is_sma20() {
        assert_eq!(FeatureEngine::standard().warmup(), 19);
    }

    #[test]
    fn window_picks_last_two_rows() {
        let window = compute_features(&rising(30)).unwrap();
        assert_eq!(window.valid_rows, 11);
        assert_eq!(window.latest.index, 29);
        assert_eq!(window.prior.index, 28);
        assert_approx(window.latest.close, 129.0, DEFAULT_EPSILON);
        // mean(120..=129)
        assert_approx(window.latest.sma10, 124.5, DEFAULT_EPSILON);
        // mean(110..=129)
        assert_approx(window.latest.sma20, 119.5, DEFAULT_EPSILON);
        assert_approx(window.latest.rsi, 100.0, DEFAULT_EPSILON);
        assert!(window.latest.macd > 0.0);
    }

    #[test]
    fn short_series_is_insufficient() {
        let err = compute_features(&rising(19)).unwrap_err();
        assert_eq!(
            err,
            FeatureError::InsufficientHistory {
                symbol: "TEST".into(),
                valid_rows: 0,
                required: MIN_VALID_ROWS,
            }
        );
    }

    #[test]
    fn twenty_bars_give_one_row() {
        let mut closes = vec![10.0; 19];
        closes.push(15.0);
        let series = PriceSeries::from_closes("TEST", &closes);
        assert_eq!(feature_table(&series).unwrap().len(), 1);
        assert!(matches!(
            compute_features(&series),
            Err(FeatureError::InsufficientHistory { valid_rows: 1, .. })
        ));
    }

    #[test]
    fn empty_series_is_missing_close() {
        let series = PriceSeries::from_closes("TEST", &[f64::NAN, f64::NAN]);
        assert!(matches!(
            compute_features(&series),
            Err(FeatureError::MissingClose { .. })
        ));
    }

    #[test]
    fn nan_closes_are_dropped_before_indicators() {
        let mut closes: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        closes.insert(5, f64::NAN);
        let series = PriceSeries::from_closes("TEST", &closes);
        let window = compute_features(&series).unwrap();
        assert_eq!(window.valid_rows, 6);
        assert!(window.latest.is_complete());
    }
}
