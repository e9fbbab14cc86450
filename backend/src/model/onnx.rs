use super::{WasteClassifier, single_probability};
use crate::error::{InitError, PredictionError};
use crate::preprocess::{CHANNELS, IMAGE_SIZE};
use ndarray::Array4;
use std::path::Path;
use tract_onnx::prelude::*;

/// ONNX export of the model, run with tract.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    name: String,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, InitError> {
        let classifier = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| Self::from_model(model, format!("onnx:{}", path.display())))
            .map_err(|e| InitError::ModelLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::info!("Loaded ONNX model from {}", path.display());
        Ok(classifier)
    }

    /// Pins the input to one NHWC image batch and optimizes the graph.
    fn from_model(model: InferenceModel, name: String) -> TractResult<Self> {
        let input_shape = [1, IMAGE_SIZE.0, IMAGE_SIZE.1, CHANNELS];
        let plan = model
            .with_input_fact(0, f32::fact(input_shape).into())?
            .into_optimized()?
            .into_runnable()?;
        Ok(Self { plan, name })
    }
}

impl WasteClassifier for OnnxClassifier {
    fn predict(&self, batch: &Array4<f32>) -> Result<f32, PredictionError> {
        let contiguous = batch.as_standard_layout();
        let data = contiguous
            .as_slice()
            .ok_or_else(|| PredictionError::Shape("batch is not contiguous".into()))?;
        let input = Tensor::from_shape(batch.shape(), data)
            .map_err(|e| PredictionError::Shape(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| PredictionError::Inference(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| PredictionError::InvalidOutput("model produced no outputs".into()))?;
        let values = output
            .as_slice::<f32>()
            .map_err(|e| PredictionError::InvalidOutput(e.to_string()))?;

        single_probability(values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
