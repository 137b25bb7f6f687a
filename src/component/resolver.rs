//! Component expansion - reduces a tree to primitive and reserved tags only

use crate::node::{renderables, Element, Node, Tag};

use super::registry::ComponentError;

/// Expand every component in `node`
///
/// Each component element is invoked with its props and its output is expanded
/// in place. Fragments are flattened along the way, so every element in the
/// result holds its children as a flat fragment. The input tree is not modified.
pub fn expand(node: &Node, max_depth: usize) -> Result<Node, ComponentError> {
    let mut out = Vec::new();
    expand_into(node, 0, max_depth, &mut out)?;
    Ok(Node::Fragment(out))
}

fn expand_into(
    node: &Node,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<Node>,
) -> Result<(), ComponentError> {
    for item in renderables(node) {
        match item {
            Node::Element(el) => match &el.tag {
                Tag::Component(component) => {
                    if depth >= max_depth {
                        return Err(ComponentError::DepthExceeded {
                            component: component.name().to_string(),
                            depth: max_depth,
                        });
                    }
                    let produced = component.call(&el.props);
                    expand_into(&produced, depth + 1, max_depth, out)?;
                }
                Tag::Primitive(_) | Tag::Reserved(_) => {
                    out.push(Node::Element(expand_element(el, depth, max_depth)?));
                }
            },
            other => out.push(other.clone()),
        }
    }
    Ok(())
}

fn expand_element(el: &Element, depth: usize, max_depth: usize) -> Result<Element, ComponentError> {
    let mut children = Vec::new();
    expand_into(&el.props.children, depth, max_depth, &mut children)?;

    let mut expanded = el.clone();
    expanded.props.children = Box::new(if children.is_empty() {
        Node::Empty
    } else {
        Node::Fragment(children)
    });
    Ok(expanded)
}
