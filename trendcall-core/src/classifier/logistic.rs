//! Logistic-regression model stored as a JSON artifact.
//!
//! ```json
//! {
//!   "feature_names": ["RSI", "MACD", "MACD_signal", "SMA10", "SMA20", "Close"],
//!   "weights": [0.01, 0.8, -0.4, 0.02, -0.02, 0.0],
//!   "bias": -0.1,
//!   "threshold": 0.5,
//!   "means": [50.0, 0.0, 0.0, 100.0, 100.0, 100.0],
//!   "scales": [10.0, 1.0, 1.0, 20.0, 20.0, 20.0]
//! }
//! ```
//!
//! `means`/`scales` are optional standardisation parameters. Loading checks
//! that `feature_names` matches the pipeline's feature order exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_finite, Classifier, ClassifierError};
use crate::domain::{FeatureVector, Prediction, FEATURE_COUNT, FEATURE_NAMES};

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub means: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales: Option<Vec<f64>>,
}

impl LogisticModel {
    /// Unstandardised model over the standard feature order.
    pub fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            weights: weights.to_vec(),
            bias,
            threshold: default_threshold(),
            means: None,
            scales: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ClassifierError::Load {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let load_err = |reason: String| ClassifierError::Load {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let model: Self = serde_json::from_str(&text).map_err(|e| load_err(e.to_string()))?;
        model.validate()?;
        debug!(path = %path.display(), threshold = model.threshold, "loaded logistic model");
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(ClassifierError::FeatureOrder {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }

        let shape_err = |what: &str, len: usize| ClassifierError::Load {
            path: "<model>".into(),
            reason: format!("{what} has {len} entries, expected {FEATURE_COUNT}"),
        };
        if self.weights.len() != FEATURE_COUNT {
            return Err(shape_err("weights", self.weights.len()));
        }
        if let Some(means) = &self.means {
            if means.len() != FEATURE_COUNT {
                return Err(shape_err("means", means.len()));
            }
        }
        if let Some(scales) = &self.scales {
            if scales.len() != FEATURE_COUNT {
                return Err(shape_err("scales", scales.len()));
            }
            if scales.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ClassifierError::Load {
                    path: "<model>".into(),
                    reason: "scales must be finite and non-zero".into(),
                });
            }
        }
        Ok(())
    }

    /// Probability of the Up class.
    pub fn probability(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        ensure_finite(features)?;

        let z = features
            .as_slice()
            .iter()
            .enumerate()
            .fold(self.bias, |acc, (i, &x)| {
                let mean = self.means.as_ref().map_or(0.0, |m| m[i]);
                let scale = self.scales.as_ref().map_or(1.0, |s| s[i]);
                acc + self.weights[i] * (x - mean) / scale
            });

        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic"
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        let p = self.probability(features)?;
        Ok(if p >= self.threshold {
            Prediction::Up
        } else {
            Prediction::Down
        })
    }
}
