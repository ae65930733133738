//! Serializable run configuration.
//!
//! ```toml
//! tickers = ["TSLA", "NVDA"]
//! parallel = false
//!
//! [source]
//! type = "yahoo"        # or "csv" (path = "...") or "synthetic"
//! period = "6mo"
//! interval = "1d"
//!
//! [model]
//! type = "logistic"     # or "onnx" (path) or "fixed" (label = 0 | 1)
//! path = "model.json"
//!
//! [output]
//! csv = "trade_records.csv"
//! bom = true
//! manifest = true
//! ```
//!
//! Every section is optional; command-line flags override file values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trendcall_core::classifier::{Classifier, ClassifierError, FixedClassifier, LogisticModel};
use trendcall_core::data::{
    BarInterval, CircuitBreaker, CsvProvider, DataError, DataProvider, FetchRequest, Lookback,
    SyntheticProvider, YahooProvider,
};
use trendcall_core::domain::Prediction;

use crate::batch::{normalize_tickers, ExecutionMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

fn default_tickers() -> Vec<String> {
    vec!["TSLA".into(), "NVDA".into()]
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            parallel: false,
            source: SourceConfig::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Where closes come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceKind {
    Yahoo {
        #[serde(default = "default_true")]
        adjusted: bool,
    },
    Csv {
        path: PathBuf,
    },
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    #[serde(flatten)]
    pub kind: SourceKind,
    #[serde(default)]
    pub period: Lookback,
    #[serde(default)]
    pub interval: BarInterval,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Yahoo { adjusted: true },
            period: Lookback::default(),
            interval: BarInterval::default(),
        }
    }
}

impl SourceConfig {
    pub fn request(&self) -> FetchRequest {
        FetchRequest::new(self.period, self.interval)
    }
}

/// Which classifier to load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelConfig {
    Logistic { path: PathBuf },
    Onnx { path: PathBuf },
    Fixed { label: i64 },
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::Logistic {
            path: PathBuf::from("model.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Trade-record CSV path. No file is written when unset.
    #[serde(default)]
    pub csv: Option<PathBuf>,

    /// Prefix the CSV with a UTF-8 BOM so spreadsheet tools detect the encoding.
    #[serde(default = "default_true")]
    pub bom: bool,

    /// Write `manifest.json` next to the CSV.
    #[serde(default)]
    pub manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: None,
            bom: true,
            manifest: false,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if normalize_tickers(&self.tickers).is_empty() {
            return Err(ConfigError::Invalid("no tickers given".into()));
        }
        if let ModelConfig::Fixed { label } = self.model {
            if Prediction::from_label(label).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "fixed model label must be 0 or 1, got {label}"
                )));
            }
        }
        if self.output.manifest && self.output.csv.is_none() {
            return Err(ConfigError::Invalid(
                "manifest output needs a csv path to sit next to".into(),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> ExecutionMode {
        if self.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    /// Manifest path: `manifest.json` beside the CSV.
    pub fn manifest_path(&self) -> Option<PathBuf> {
        if !self.output.manifest {
            return None;
        }
        self.output.csv.as_ref().map(|csv| {
            csv.parent()
                .unwrap_or_else(|| Path::new(""))
                .join("manifest.json")
        })
    }

    /// Build the configured data provider. Synthetic series end on `run_date`.
    pub fn build_provider(&self, run_date: NaiveDate) -> Result<Box<dyn DataProvider>, ConfigError> {
        let provider: Box<dyn DataProvider> = match &self.source.kind {
            SourceKind::Yahoo { adjusted } => {
                let breaker = Arc::new(CircuitBreaker::default_provider());
                Box::new(YahooProvider::new(breaker)?.with_adjusted(*adjusted))
            }
            SourceKind::Csv { path } => {
                if !path.exists() {
                    return Err(ConfigError::Invalid(format!(
                        "csv source {} does not exist",
                        path.display()
                    )));
                }
                Box::new(CsvProvider::new(path))
            }
            SourceKind::Synthetic => Box::new(SyntheticProvider::new(run_date)),
        };
        Ok(provider)
    }

    /// Load the configured classifier.
    pub fn build_classifier(&self) -> Result<Arc<dyn Classifier>, ConfigError> {
        match &self.model {
            ModelConfig::Logistic { path } => Ok(Arc::new(LogisticModel::load(path)?)),
            ModelConfig::Fixed { label } => {
                let prediction = Prediction::from_label(*label)
                    .ok_or(ClassifierError::UnknownLabel(*label))?;
                Ok(Arc::new(FixedClassifier::new(prediction)))
            }
            #[cfg(feature = "onnx")]
            ModelConfig::Onnx { path } => Ok(Arc::new(
                trendcall_core::classifier::OnnxModel::load(path)?,
            )),
            #[cfg(not(feature = "onnx"))]
            ModelConfig::Onnx { path } => Err(ConfigError::Invalid(format!(
                "{} is an ONNX model but this build lacks the `onnx` feature",
                path.display()
            ))),
        }
    }
}
