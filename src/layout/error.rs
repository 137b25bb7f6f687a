//! Error types for the layout pass

use thiserror::Error;

use crate::component::ComponentError;
use crate::text::MeasureError;

/// Errors that can occur during layout computation
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// The metrics provider failed while sizing a text box
    #[error("failed to measure text {text:?}: {source}")]
    Measure {
        text: String,
        #[source]
        source: MeasureError,
    },

    /// Component expansion failed
    #[error(transparent)]
    Component(#[from] ComponentError),
}

impl LayoutError {
    /// Create a measurement error for a text box
    pub fn measure(text: impl Into<String>, source: MeasureError) -> Self {
        let mut text = text.into();
        if text.chars().count() > 32 {
            text = text.chars().take(32).collect::<String>() + "…";
        }
        Self::Measure { text, source }
    }
}
