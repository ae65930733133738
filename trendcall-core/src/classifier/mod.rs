//! Classifier seam: feature vector → binary direction.
//!
//! The pipeline only sees `dyn Classifier`; concrete models are loaded by
//! the caller and injected.

pub mod fixed;
pub mod logistic;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use fixed::FixedClassifier;
pub use logistic::LogisticModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{FeatureVector, Prediction};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("model feature order {found:?} does not match {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("feature {name} is not finite ({value})")]
    NonFiniteFeature { name: &'static str, value: f64 },

    #[error("classifier returned unknown label {0}")]
    UnknownLabel(i64),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Trait for pretrained binary classifiers.
pub trait Classifier: Send + Sync {
    /// Short identifier, recorded in the batch manifest.
    fn name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError>;
}

/// Reject vectors holding NaN or infinity before they reach a model.
pub fn ensure_finite(features: &FeatureVector) -> Result<(), ClassifierError> {
    match features.first_non_finite() {
        Some((name, value)) => Err(ClassifierError::NonFiniteFeature { name, value }),
        None => Ok(()),
    }
}

/// Map a raw label to a prediction.
pub fn label_to_prediction(label: i64) -> Result<Prediction, ClassifierError> {
    Prediction::from_label(label).ok_or(ClassifierError::UnknownLabel(label))
}
