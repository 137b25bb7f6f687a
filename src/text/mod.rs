//! Text metrics
//!
//! Sizes text boxes from their content and font props. Family preference lists
//! are resolved against the registered fonts, falling back through a table of
//! generic-family substitutes and finally to a best-effort first candidate.

pub mod config;
pub mod family;
pub mod measure;
pub mod registry;

pub use config::{FontConfig, FontConfigError};
pub use family::{decode_font_family, resolve_font_family, split_font_family, ResolvedFamily};
pub use measure::{
    explicit_dimension, measure_text, FontCatalog, FontSpec, FontWeight, MeasureError,
    TextMeasurer, TextMetrics, TextSize,
};
pub use registry::{global_registry, install_global, FontData, FontError, FontRegistry};
