use crate::error::PredictionError;
use crate::model::SharedClassifier;
use crate::preprocess::prepare_batch;
use waste_shared::{ImageSource, PredictionResult, RenderPlan, SessionEvent, SessionState};

/// Result of one evaluation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub state: SessionState,
    pub plan: RenderPlan,
}

/// Runs the acquisition-to-prediction pipeline for one session cycle.
///
/// Holds no session data itself; state comes in with every call and the
/// next state goes back out with the render plan.
#[derive(Clone)]
pub struct SessionController {
    classifier: SharedClassifier,
}

impl SessionController {
    pub fn new(classifier: SharedClassifier) -> Self {
        Self { classifier }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn predict(&self, image: &[u8]) -> Result<PredictionResult, PredictionError> {
        let batch = prepare_batch(image)?;
        let probability = self.classifier.predict(&batch)?;
        Ok(PredictionResult::from_probability(probability))
    }

    pub fn run_cycle(
        &self,
        state: SessionState,
        event: Option<SessionEvent>,
        upload: Option<&[u8]>,
    ) -> Cycle {
        let state = match event {
            Some(event) => state.apply(event),
            None => state,
        };

        let plan = match state.resolve_candidate(upload) {
            Err(prompt) => RenderPlan::prompt(&state, prompt),
            Ok(candidate) => {
                let source = ImageSource::from(candidate);
                let outcome = self.predict(candidate.bytes());
                match &outcome {
                    Ok(result) => log::info!(
                        "{:?} image classified as {} ({})",
                        source,
                        result.label,
                        result.confidence
                    ),
                    Err(e) => log::warn!("Prediction failed for {:?} image: {}", source, e),
                }
                RenderPlan::evaluated(&state, source, &outcome)
            }
        };

        Cycle { state, plan }
    }
}
