//! Hoisting of `Defs` blocks into a single root-level collection

use crate::node::{renderables, Element, Node};

/// Per-render state threaded through the serializer walk
///
/// A fresh context is created for every render call and is never shared.
#[derive(Debug, Default)]
pub struct RenderContext {
    /// Definition contents in encounter order. Duplicate ids are kept as-is.
    pub defs: Vec<Node>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Remove every `Defs` element from `nodes`, appending their contents to `ctx`
///
/// Returns the visible tree with fragments flattened. `Defs` blocks are found
/// at any depth; a `Defs` nested inside another is unwrapped in place.
pub fn hoist_defs(nodes: &[Node], ctx: &mut RenderContext) -> Vec<Node> {
    let mut visible = Vec::new();
    for node in nodes {
        hoist_node(node, ctx, &mut visible);
    }
    visible
}

fn hoist_node(node: &Node, ctx: &mut RenderContext, out: &mut Vec<Node>) {
    for item in renderables(node) {
        match item {
            Node::Element(el) if el.is_defs() => collect_defs(el.children(), ctx),
            Node::Element(el) => out.push(Node::Element(strip_element(el, ctx))),
            other => out.push(other.clone()),
        }
    }
}

fn strip_element(el: &Element, ctx: &mut RenderContext) -> Element {
    let mut children = Vec::new();
    hoist_node(el.children(), ctx, &mut children);

    let mut stripped = el.clone();
    stripped.props.children = Box::new(if children.is_empty() {
        Node::Empty
    } else {
        Node::Fragment(children)
    });
    stripped
}

fn collect_defs(content: &Node, ctx: &mut RenderContext) {
    for item in renderables(content) {
        match item {
            Node::Element(el) if el.is_defs() => collect_defs(el.children(), ctx),
            Node::Element(el) => {
                // reserve the slot so the parent precedes anything hoisted out of it
                let slot = ctx.defs.len();
                ctx.defs.push(Node::Empty);
                ctx.defs[slot] = Node::Element(strip_element(el, ctx));
            }
            other => ctx.defs.push(other.clone()),
        }
    }
}
