//! Classifier that always answers the same label.

use super::{ensure_finite, Classifier, ClassifierError};
use crate::domain::{FeatureVector, Prediction};

#[derive(Debug, Clone)]
pub struct FixedClassifier {
    prediction: Prediction,
    name: String,
}

impl FixedClassifier {
    pub fn new(prediction: Prediction) -> Self {
        Self {
            prediction,
            name: format!("fixed_{prediction}"),
        }
    }

    pub fn up() -> Self {
        Self::new(Prediction::Up)
    }

    pub fn down() -> Self {
        Self::new(Prediction::Down)
    }
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        ensure_finite(features)?;
        Ok(self.prediction)
    }
}
