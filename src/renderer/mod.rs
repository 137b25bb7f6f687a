//! SVG renderer for generating output from layout results
//!
//! This module takes a LayoutResult, hoists every `Defs` block into a single
//! root-level `<defs>` and produces an SVG document string.

pub mod attrs;
pub mod config;
pub mod defs;
pub mod svg;

pub use config::SvgConfig;
pub use defs::{hoist_defs, RenderContext};
pub use svg::{render_svg, SvgBuilder};
