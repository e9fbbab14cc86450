use super::{WasteClassifier, single_probability};
use crate::error::{InitError, PredictionError};
use ndarray::Array4;
use std::path::Path;
use std::sync::Mutex;
use tch::{CModule, Device, Kind, Tensor};

/// TorchScript export of the model, run through libtorch.
pub struct TorchClassifier {
    model: Mutex<CModule>,
    device: Device,
    name: String,
}

impl TorchClassifier {
    pub fn load(path: &Path) -> Result<Self, InitError> {
        let device = Device::cuda_if_available();
        let mut model = CModule::load_on_device(path, device).map_err(|e| InitError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        model.set_eval();

        log::info!("Loaded TorchScript model from {} on {:?}", path.display(), device);
        Ok(Self {
            model: Mutex::new(model),
            device,
            name: format!("torchscript:{}", path.display()),
        })
    }
}

impl WasteClassifier for TorchClassifier {
    fn predict(&self, batch: &Array4<f32>) -> Result<f32, PredictionError> {
        let shape: Vec<i64> = batch.shape().iter().map(|&d| d as i64).collect();
        let contiguous = batch.as_standard_layout();
        let data = contiguous
            .as_slice()
            .ok_or_else(|| PredictionError::Shape("batch is not contiguous".into()))?;
        let input = Tensor::from_slice(data).view(shape.as_slice()).to_device(self.device);

        let output = {
            let model = self
                .model
                .lock()
                .map_err(|_| PredictionError::Inference("model lock poisoned".into()))?;
            tch::no_grad(|| model.forward_ts(&[input]))
                .map_err(|e| PredictionError::Inference(e.to_string()))?
        };

        let output_flat = output.to_kind(Kind::Float).to_device(Device::Cpu).view([-1]);
        let num_elements = output_flat.size()[0] as usize;
        let mut values = vec![0.0f32; num_elements];
        output_flat.copy_data(&mut values, num_elements);

        single_probability(&values)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
