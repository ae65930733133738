//! Batch orchestration: one outcome per ticker, collected in submission order.
//!
//! Each ticker is fetched and scored independently. Failures are converted to
//! `SkippedTicker` entries; nothing escapes the per-ticker boundary and there
//! is no shared accumulator. Parallel mode uses rayon's `par_iter`, whose
//! `collect` keeps input order, so both modes return identical results.

use std::collections::HashSet;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use trendcall_core::data::{DataProvider, FetchRequest};
use trendcall_core::domain::TradeRecord;
use trendcall_core::fingerprint::{dataset_hash, DatasetHash};
use trendcall_core::pipeline::{ScoreError, ScoringPipeline};

pub type TickerOutcome = Result<TradeRecord, ScoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// A ticker that produced no record, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    /// Machine-readable tag (`data_unavailable`, `insufficient_history`, ...).
    pub kind: String,
    pub reason: String,
}

/// The data a ticker was scored from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub ticker: String,
    pub bars: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub hash: DatasetHash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub run_date: NaiveDate,
    /// Normalised tickers in submission order.
    pub tickers: Vec<String>,
    pub records: Vec<TradeRecord>,
    pub skipped: Vec<SkippedTicker>,
    pub datasets: Vec<DatasetEntry>,
}

impl BatchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn actionable(&self) -> impl Iterator<Item = &TradeRecord> {
        self.records.iter().filter(|r| r.is_actionable())
    }
}

/// Trim, upper-case and de-duplicate tickers, keeping first-seen order.
pub fn normalize_tickers<S: AsRef<str>>(tickers: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tickers
        .iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

struct Scored {
    ticker: String,
    dataset: Option<DatasetEntry>,
    outcome: TickerOutcome,
}

fn score_ticker(
    ticker: &str,
    provider: &dyn DataProvider,
    pipeline: &ScoringPipeline,
    request: &FetchRequest,
    run_date: NaiveDate,
) -> Scored {
    let series = match provider.fetch(ticker, request) {
        Ok(series) => series,
        Err(e) => {
            return Scored {
                ticker: ticker.to_string(),
                dataset: None,
                outcome: Err(e.into()),
            }
        }
    };

    let dataset = DatasetEntry {
        ticker: ticker.to_string(),
        bars: series.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        hash: dataset_hash(&series),
    };

    Scored {
        ticker: ticker.to_string(),
        dataset: Some(dataset),
        outcome: pipeline.score(&series, run_date),
    }
}

pub fn score_batch<S: AsRef<str>>(
    tickers: &[S],
    provider: &dyn DataProvider,
    pipeline: &ScoringPipeline,
    request: &FetchRequest,
    run_date: NaiveDate,
    mode: ExecutionMode,
) -> BatchResult {
    let tickers = normalize_tickers(tickers);
    info!(
        count = tickers.len(),
        provider = provider.name(),
        classifier = pipeline.classifier_name(),
        ?mode,
        "scoring batch"
    );

    let scored: Vec<Scored> = match mode {
        ExecutionMode::Parallel => tickers
            .par_iter()
            .map(|t| score_ticker(t, provider, pipeline, request, run_date))
            .collect(),
        ExecutionMode::Sequential => tickers
            .iter()
            .map(|t| score_ticker(t, provider, pipeline, request, run_date))
            .collect(),
    };

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut datasets = Vec::new();
    for s in scored {
        datasets.extend(s.dataset);
        match s.outcome {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(ticker = %s.ticker, kind = e.kind(), "skipped: {e}");
                skipped.push(SkippedTicker {
                    ticker: s.ticker,
                    kind: e.kind().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(records = records.len(), skipped = skipped.len(), "batch complete");

    BatchResult {
        run_date,
        tickers,
        records,
        skipped,
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_uppercases_dedupes() {
        let tickers = normalize_tickers(&[" tsla", "NVDA", "tsla ", "", "  ", "aapl"]);
        assert_eq!(tickers, vec!["TSLA", "NVDA", "AAPL"]);
    }

    #[test]
    fn normalize_accepts_owned_strings() {
        let owned = vec!["spy".to_string(), "SPY".to_string()];
        assert_eq!(normalize_tickers(&owned), vec!["SPY"]);
    }

    proptest::proptest! {
        #[test]
        fn normalize_is_idempotent_and_unique(
            raw in proptest::collection::vec("[ a-zA-Z.]{0,6}", 0..12)
        ) {
            let once = normalize_tickers(&raw);
            let twice = normalize_tickers(&once);
            proptest::prop_assert_eq!(&once, &twice);
            let unique: HashSet<&String> = once.iter().collect();
            proptest::prop_assert_eq!(unique.len(), once.len());
            proptest::prop_assert!(once.iter().all(|t| !t.is_empty() && t.trim() == t.as_str()));
        }
    }
}
