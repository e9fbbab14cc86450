//! Domain types shared by the waste classification backend and frontend.
//!
//! Everything in here is pure: session transitions, candidate resolution,
//! the decision rule and the render plan are plain functions over
//! serializable values so both sides of the wire agree on them.

pub mod category;
pub mod prediction;
pub mod render;
pub mod session;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use category::WasteCategory;
pub use prediction::{Confidence, PredictionResult};
pub use render::{Block, ImageSource, RenderPlan};
pub use session::{CandidateSource, InputMode, InputWidget, PendingCapture, Prompt, SessionEvent, SessionState};

/// Body of a successful `POST /api/cycle`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CycleResponse {
    pub cycle_id: Uuid,
    pub state: SessionState,
    pub plan: RenderPlan,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
}

/// Error body returned by the API for rejected requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
