//! Virtual node model
//!
//! A lightweight tree of tagged elements, text leaves and fragments that is
//! independent of any DOM. Elements are either primitive markup tags, reserved
//! constructs such as `Defs`, or component functions expanded before layout.

pub mod builder;
pub mod flatten;
pub mod types;

pub use builder::{clone_element, component, defs, element, ellipse, group, path, rect, text};
pub use flatten::{coerce_text, elements_only, flatten, flatten_into, renderables, Renderables};
pub use types::*;
