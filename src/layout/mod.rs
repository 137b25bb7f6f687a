//! Layout pass for computing element sizes and bounds
//!
//! This module takes a node tree, expands its components and fills in the
//! geometry that was left implicit, producing a LayoutResult whose root nodes
//! carry resolved sizes and whose bounds cover every top-level element.

pub mod bounds;
pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use bounds::{get_combined_bounds, get_element_bounds, get_elements_bounds};
pub use config::LayoutConfig;
pub use engine::compute;
pub use error::LayoutError;
pub use types::*;
