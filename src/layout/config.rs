//! Configuration for the layout pass

use crate::text::FontSpec;

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Text style applied where a text box does not set its own
    pub font: FontSpec,

    /// Factor applied to measured text extents before rounding up
    pub size_inflation: f64,

    /// Maximum nesting of component calls before expansion gives up
    pub max_component_depth: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            size_inflation: 1.01,
            max_component_depth: 64,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default text style
    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Set the default font family list
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font.font_family = family.into();
        self
    }

    /// Set the measurement inflation factor
    pub fn with_size_inflation(mut self, inflation: f64) -> Self {
        self.size_inflation = inflation;
        self
    }

    /// Set the component expansion depth limit
    pub fn with_max_component_depth(mut self, depth: usize) -> Self {
        self.max_component_depth = depth;
        self
    }
}
