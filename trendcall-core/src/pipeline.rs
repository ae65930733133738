//! Per-ticker scoring: series → features → prediction → record.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::classifier::{Classifier, ClassifierError};
use crate::data::DataError;
use crate::decision::compose;
use crate::domain::{PriceSeries, TradeRecord};
use crate::features::{FeatureEngine, FeatureError};

/// Why a ticker produced no record. Never escapes the ticker it belongs to.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("insufficient history: {valid_rows} valid rows, need {required}")]
    InsufficientHistory { valid_rows: usize, required: usize },

    #[error("classifier failure: {0}")]
    ClassifierFailure(#[from] ClassifierError),
}

impl ScoreError {
    /// Stable machine-readable tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::DataUnavailable(_) => "data_unavailable",
            ScoreError::InsufficientHistory { .. } => "insufficient_history",
            ScoreError::ClassifierFailure(_) => "classifier_failure",
        }
    }
}

impl From<FeatureError> for ScoreError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::MissingClose { .. } => ScoreError::DataUnavailable(err.to_string()),
            FeatureError::InsufficientHistory {
                valid_rows,
                required,
                ..
            } => ScoreError::InsufficientHistory {
                valid_rows,
                required,
            },
        }
    }
}

impl From<DataError> for ScoreError {
    fn from(err: DataError) -> Self {
        ScoreError::DataUnavailable(err.to_string())
    }
}

/// Indicator engine plus an injected classifier. Shared across worker threads.
#[derive(Clone)]
pub struct ScoringPipeline {
    engine: FeatureEngine,
    classifier: Arc<dyn Classifier>,
}

impl ScoringPipeline {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            engine: FeatureEngine::standard(),
            classifier,
        }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn engine(&self) -> &FeatureEngine {
        &self.engine
    }

    pub fn score(&self, series: &PriceSeries, run_date: NaiveDate) -> Result<TradeRecord, ScoreError> {
        let window = self.engine.compute(series)?;
        let features = window.latest.to_vector();
        let prediction = self.classifier.predict(&features)?;

        debug!(
            symbol = series.symbol(),
            valid_rows = window.valid_rows,
            %prediction,
            "scored"
        );

        Ok(compose(
            series.symbol(),
            run_date,
            &window.latest,
            &window.prior,
            prediction,
        ))
    }
}

impl std::fmt::Debug for ScoringPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPipeline")
            .field("engine", &self.engine)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
