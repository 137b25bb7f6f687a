//! Layout pass: fills in missing geometry, children before parents

use crate::component;
use crate::node::{coerce_text, elements_only, renderables, Element, Node};
use crate::text::{explicit_dimension, TextMeasurer, TextMetrics};

use super::bounds::get_elements_bounds;
use super::config::LayoutConfig;
use super::error::LayoutError;
use super::types::{BoundingBox, LayoutResult};

/// Compute layout for a tree
///
/// Components are expanded first. Text boxes without an explicit size are
/// measured, and containers without one receive the union bounds of their
/// already-resolved children. The input tree is not modified; a new tree is
/// returned along with the bounds of its top-level elements.
pub fn compute(
    tree: &Node,
    measurer: &dyn TextMeasurer,
    config: &LayoutConfig,
) -> Result<LayoutResult, LayoutError> {
    let expanded = component::expand(tree, config.max_component_depth)?;
    let engine = LayoutEngine {
        metrics: TextMetrics::new(measurer, &config.font).with_inflation(config.size_inflation),
        config,
    };

    let root = renderables(&expanded)
        .map(|node| engine.layout_node(node))
        .collect::<Result<Vec<_>, _>>()?;
    let bounds = get_elements_bounds(root.iter().filter_map(Node::as_element));

    log::debug!("Layout computed for {} root nodes, bounds {:?}.", root.len(), bounds);
    Ok(LayoutResult { root, bounds })
}

struct LayoutEngine<'a> {
    metrics: TextMetrics<'a>,
    config: &'a LayoutConfig,
}

impl LayoutEngine<'_> {
    fn layout_node(&self, node: &Node) -> Result<Node, LayoutError> {
        match node {
            Node::Element(el) => self.layout_element(el).map(Node::Element),
            other => Ok(other.clone()),
        }
    }

    fn layout_element(&self, el: &Element) -> Result<Element, LayoutError> {
        if el.is_defs() {
            return Ok(el.clone());
        }
        if el.tag_name() == Some("text") {
            return self.layout_text(el);
        }

        let mut out = el.clone();
        out.props.children = Box::new(self.layout_children(&el.props.children)?);

        let has_width = out.props.number("width").is_some();
        let has_height = out.props.number("height").is_some();
        if !(has_width && has_height) {
            if let Some(union) = get_elements_bounds(elements_only(&out.props.children)) {
                fill_container(&mut out, union, has_width, has_height);
            }
        }
        Ok(out)
    }

    fn layout_children(&self, children: &Node) -> Result<Node, LayoutError> {
        let laid_out = renderables(children)
            .map(|child| self.layout_node(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(if laid_out.is_empty() {
            Node::Empty
        } else {
            Node::Fragment(laid_out)
        })
    }

    fn layout_text(&self, el: &Element) -> Result<Element, LayoutError> {
        let mut out = el.clone();
        let defaults = &self.config.font;
        if !out.props.contains("fontFamily") {
            out.props.set("fontFamily", defaults.font_family.clone());
        }
        if !out.props.contains("fontSize") {
            out.props.set("fontSize", defaults.font_size);
        }
        if !out.props.contains("lineHeight") {
            out.props.set("lineHeight", defaults.line_height);
        }

        let has_width = explicit_dimension(&out.props, "width").is_some();
        let has_height = explicit_dimension(&out.props, "height").is_some();
        if has_width && has_height {
            return Ok(out);
        }

        let content = coerce_text(&out.props.children);
        let size = self
            .metrics
            .measure(&content, &out.props)
            .map_err(|e| LayoutError::measure(content.as_str(), e))?;
        log::debug!("Measured {:?}: {} x {}.", content, size.width, size.height);

        if !has_width {
            out.props.set("width", size.width);
        }
        if !has_height {
            out.props.set("height", size.height);
        }
        Ok(out)
    }
}

/// Write union-derived geometry onto a container that lacks it
///
/// A group has no coordinate system of its own, so each missing axis takes the
/// union's origin and extent outright. Other containers keep their own origin
/// (0 when unset) and extend to the union's far edges.
fn fill_container(el: &mut Element, union: BoundingBox, has_width: bool, has_height: bool) {
    if el.tag_name() == Some("g") {
        if !has_width {
            el.props.set("x", union.x);
            el.props.set("width", union.width);
        }
        if !has_height {
            el.props.set("y", union.y);
            el.props.set("height", union.height);
        }
        return;
    }

    let x = el.props.number("x").unwrap_or(0.0);
    let y = el.props.number("y").unwrap_or(0.0);
    if !has_width {
        el.props.set("width", (union.right() - x).max(0.0));
    }
    if !has_height {
        el.props.set("height", (union.bottom() - y).max(0.0));
    }
}
