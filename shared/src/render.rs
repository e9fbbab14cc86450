use crate::prediction::PredictionResult;
use crate::session::{CandidateSource, InputWidget, Prompt, SessionState};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Where the displayed candidate image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    Upload,
    Capture,
}

impl ImageSource {
    pub fn caption(self) -> &'static str {
        match self {
            ImageSource::Upload => "Uploaded Image",
            ImageSource::Capture => "Captured Image",
        }
    }
}

impl From<CandidateSource<'_>> for ImageSource {
    fn from(source: CandidateSource<'_>) -> Self {
        match source {
            CandidateSource::Upload(_) => ImageSource::Upload,
            CandidateSource::Capture(_) => ImageSource::Capture,
        }
    }
}

/// One display element, rendered top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Block {
    Image { source: ImageSource, caption: String },
    Metric { label: String, value: String },
    Info { text: String },
    Error { text: String },
    Divider,
}

/// Everything the UI needs to draw one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub widget: InputWidget,
    pub blocks: Vec<Block>,
}

impl RenderPlan {
    pub fn prompt(state: &SessionState, prompt: Prompt) -> Self {
        Self {
            widget: state.widget(),
            blocks: vec![Block::Info {
                text: prompt.message().to_string(),
            }],
        }
    }

    /// Plan for a cycle that had a candidate image, whatever the outcome.
    pub fn evaluated<E: Display>(
        state: &SessionState,
        source: ImageSource,
        outcome: &Result<PredictionResult, E>,
    ) -> Self {
        let mut blocks = vec![Block::Image {
            source,
            caption: source.caption().to_string(),
        }];

        match outcome {
            Ok(result) => {
                blocks.push(Block::Divider);
                blocks.extend(result.metrics().into_iter().map(|(label, value)| Block::Metric {
                    label: label.to_string(),
                    value,
                }));
                blocks.push(Block::Info {
                    text: result.guidance().to_string(),
                });
                blocks.push(Block::Divider);
            }
            Err(e) => blocks.push(Block::Error {
                text: format!("An error occurred during prediction: {}", e),
            }),
        }

        Self {
            widget: state.widget(),
            blocks,
        }
    }
}
