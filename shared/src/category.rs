use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The two classes the model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum WasteCategory {
    Organic,
    Recyclable,
}

impl WasteCategory {
    /// Short disposal hint shown under a prediction.
    pub fn guidance(self) -> &'static str {
        match self {
            WasteCategory::Organic => "This looks like organic waste! It can be composted.",
            WasteCategory::Recyclable => {
                "This looks like recyclable material! Please dispose of it responsibly."
            }
        }
    }
}
