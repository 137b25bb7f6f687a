//! vnode-svg - Render declarative node trees to SVG
//!
//! This library provides a lightweight node model, a layout pass that sizes
//! text and containers, and a serializer that hoists shared definitions into a
//! single `<defs>` block.
//!
//! # Example
//!
//! ```rust
//! use vnode_svg::node::{builder, Node, Props};
//! use vnode_svg::render;
//!
//! let tree = Node::from(vec![
//!     Node::from(builder::defs(builder::element(
//!         "linearGradient",
//!         Props::new().with("id", "fade"),
//!     ))),
//!     Node::from(builder::rect(
//!         Props::new().with("width", 40).with("height", 20).with("fill", "url(#fade)"),
//!     )),
//! ]);
//!
//! let svg = render(&tree).unwrap();
//! assert!(svg.contains("<defs>"));
//! assert!(svg.contains(r#"fill="url(#fade)""#));
//! ```

pub mod component;
pub mod document;
pub mod error;
pub mod layout;
pub mod node;
pub mod renderer;
pub mod text;

pub use component::{ComponentError, ComponentRegistry};
pub use error::LoadError;
pub use layout::{
    get_combined_bounds, get_element_bounds, get_elements_bounds, BoundingBox, LayoutConfig,
    LayoutError, LayoutResult,
};
pub use node::{clone_element, Node};
pub use renderer::{render_svg, SvgConfig};
pub use text::{global_registry, install_global, measure_text, FontConfig, FontRegistry, TextMeasurer};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error while loading a serialized document
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Error during layout
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Debug mode: log the laid-out tree
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Compute the layout of a tree with the global font registry
pub fn create_layout(tree: &Node) -> Result<LayoutResult, LayoutError> {
    layout::compute(tree, global_registry(), &LayoutConfig::default())
}

/// Render a tree to SVG with default configuration
///
/// This is the main entry point for the library. It expands components,
/// computes layout against the global font registry and generates SVG output.
pub fn render(tree: &Node) -> Result<String, RenderError> {
    render_with_config(tree, &RenderConfig::default())
}

/// Render a tree to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use vnode_svg::node::{builder, Node, Props};
/// use vnode_svg::{render_with_config, LayoutConfig, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_font_family("monospace"))
///     .with_svg(SvgConfig::compact().with_viewbox_padding(8.0));
///
/// let tree = Node::from(builder::text(Props::new(), "Hello"));
/// let svg = render_with_config(&tree, &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains("Hello</text>"));
/// ```
pub fn render_with_config(tree: &Node, config: &RenderConfig) -> Result<String, RenderError> {
    render_with_measurer(tree, global_registry(), config)
}

/// Render a tree to SVG, measuring text with `measurer`
pub fn render_with_measurer(
    tree: &Node,
    measurer: &dyn TextMeasurer,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let result = layout::compute(tree, measurer, &config.layout)?;

    if config.debug {
        log::debug!("=== Layout Debug ===");
        for node in &result.root {
            log_tree(node, 0);
        }
        log::debug!("====================");
    }

    Ok(render_svg(&result, &config.svg))
}

/// Load a JSON document and render it to SVG
pub fn render_document(
    source: &str,
    registry: &ComponentRegistry,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let tree = document::parse(source, registry)?;
    render_with_config(&tree, config)
}

fn log_tree(node: &Node, depth: usize) {
    for item in node::renderables(node) {
        let indent = "  ".repeat(depth);
        match item {
            Node::Element(el) => {
                let bounds = get_element_bounds(el);
                match bounds {
                    Some(b) => log::debug!(
                        "{}<{}> x={:.1} y={:.1} w={:.1} h={:.1}",
                        indent,
                        el.tag,
                        b.x,
                        b.y,
                        b.width,
                        b.height
                    ),
                    None => log::debug!("{}<{}>", indent, el.tag),
                }
                log_tree(el.children(), depth + 1);
            }
            Node::Text(leaf) => log::debug!("{}{:?}", indent, leaf.to_string()),
            Node::Empty | Node::Fragment(_) => {}
        }
    }
}
