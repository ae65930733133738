//! ONNX classifier via tract.
//!
//! Input is a `(1, 6)` f32 tensor in feature order. Models exported with an
//! integer label output (first output, i64) are read directly; otherwise the
//! first output is taken as probabilities and the Up probability (last
//! column) is compared with 0.5.

use std::path::Path;
use std::sync::Arc;

use tract_onnx::prelude::*;
use tracing::info;

use super::{ensure_finite, label_to_prediction, Classifier, ClassifierError};
use crate::domain::{FeatureVector, Prediction, FEATURE_COUNT};

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

#[derive(Clone)]
pub struct OnnxModel {
    model: Arc<RunnableModel>,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        info!(path = %path.display(), "loading ONNX model");
        let plan = Self::build(path).map_err(|e| ClassifierError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            model: Arc::new(plan),
        })
    }

    fn build(path: &Path) -> TractResult<RunnableModel> {
        tract_onnx::onnx()
            .model_for_path(path)?
            .into_optimized()?
            .into_runnable()
    }

    fn run(&self, features: &FeatureVector) -> TractResult<Prediction> {
        let tensor =
            tract_ndarray::Array::from_shape_vec((1, FEATURE_COUNT), features.to_f32())?
                .into_tensor();
        let outputs = self.model.run(tvec!(tensor.into()))?;
        let first = &outputs[0];

        if let Ok(labels) = first.to_array_view::<i64>() {
            let label = labels.iter().next().copied().unwrap_or(-1);
            return label_to_prediction(label).map_err(TractError::new);
        }

        let probs = first.to_array_view::<f32>()?;
        let up = probs.iter().last().copied().unwrap_or(0.5);
        Ok(if up >= 0.5 {
            Prediction::Up
        } else {
            Prediction::Down
        })
    }
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel").finish_non_exhaustive()
    }
}

impl Classifier for OnnxModel {
    fn name(&self) -> &str {
        "onnx"
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, ClassifierError> {
        ensure_finite(features)?;
        self.run(features).map_err(|e| match e.downcast::<ClassifierError>() {
            Ok(inner) => inner,
            Err(other) => ClassifierError::Inference(other.to_string()),
        })
    }
}
