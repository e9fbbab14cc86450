//! The classifier boundary: load an artifact once, query it per image.

mod onnx;
#[cfg(feature = "libtorch")]
mod torch;

pub use onnx::OnnxClassifier;
#[cfg(feature = "libtorch")]
pub use torch::TorchClassifier;

use crate::error::{InitError, PredictionError};
use ndarray::Array4;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// A loaded two-class waste model.
///
/// `predict` takes a `(1, 128, 128, 3)` batch and returns the single sigmoid
/// output. Implementations must be usable from several threads at once.
pub trait WasteClassifier: Send + Sync {
    fn predict(&self, batch: &Array4<f32>) -> Result<f32, PredictionError>;

    /// Human-readable description, used in logs and the health endpoint.
    fn name(&self) -> &str;
}

pub type SharedClassifier = Arc<dyn WasteClassifier>;

static MODEL: OnceLock<SharedClassifier> = OnceLock::new();

/// Loads the model the first time it is called and hands out the same
/// handle afterwards.
pub fn load_once(path: &Path) -> Result<SharedClassifier, InitError> {
    if let Some(model) = MODEL.get() {
        return Ok(Arc::clone(model));
    }
    let loaded = load(path)?;
    Ok(Arc::clone(MODEL.get_or_init(|| loaded)))
}

/// Loads a model, picking the backend from the file extension.
pub fn load(path: &Path) -> Result<SharedClassifier, InitError> {
    if !path.is_file() {
        return Err(InitError::ModelNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("onnx") => Ok(Arc::new(OnnxClassifier::load(path)?)),
        Some("pt") => load_torchscript(path),
        _ => Err(InitError::UnsupportedModelFormat(path.to_path_buf())),
    }
}

#[cfg(feature = "libtorch")]
fn load_torchscript(path: &Path) -> Result<SharedClassifier, InitError> {
    Ok(Arc::new(TorchClassifier::load(path)?))
}

#[cfg(not(feature = "libtorch"))]
fn load_torchscript(path: &Path) -> Result<SharedClassifier, InitError> {
    Err(InitError::BackendDisabled {
        backend: "libtorch",
        path: path.to_path_buf(),
    })
}

/// Checks the raw model output: exactly one finite probability.
pub(crate) fn single_probability(values: &[f32]) -> Result<f32, PredictionError> {
    match values {
        [p] if p.is_finite() && (0.0..=1.0).contains(p) => Ok(*p),
        [p] => Err(PredictionError::InvalidOutput(format!(
            "probability {} is outside [0, 1]",
            p
        ))),
        _ => Err(PredictionError::InvalidOutput(format!(
            "expected a single output value, got {}",
            values.len()
        ))),
    }
}
