use crate::category::WasteCategory;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Output strictly above this goes to `Recyclable`.
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Percentage strength of the winning class, shown with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display(fmt = "{:.2}%", _0)]
pub struct Confidence(pub f32);

impl Confidence {
    pub fn percent(self) -> f32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: WasteCategory,
    pub confidence: Confidence,
}

impl PredictionResult {
    /// Maps the model's single sigmoid output to a labeled result.
    ///
    /// `probability` is expected in `[0, 1]`; the winning side always
    /// carries at least 50% confidence.
    pub fn from_probability(probability: f32) -> Self {
        if probability > DECISION_THRESHOLD {
            Self {
                label: WasteCategory::Recyclable,
                confidence: Confidence(probability * 100.0),
            }
        } else {
            Self {
                label: WasteCategory::Organic,
                confidence: Confidence((1.0 - probability) * 100.0),
            }
        }
    }

    /// The (label, value) metric pairs displayed for this result.
    pub fn metrics(&self) -> [(&'static str, String); 2] {
        [
            ("Predicted Category", self.label.to_string()),
            ("Confidence", self.confidence.to_string()),
        ]
    }

    pub fn guidance(&self) -> &'static str {
        self.label.guidance()
    }
}
