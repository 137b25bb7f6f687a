//! Normalization of nested fragments into flat renderable sequences

use super::types::{Element, Node};

/// Lazy, order-preserving iterator over the renderable leaves of a node
///
/// Fragments are walked depth-first, `Empty` nodes are skipped and elements are
/// yielded whole (their children are not visited).
pub struct Renderables<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
    pending: Option<&'a Node>,
}

impl<'a> Iterator for Renderables<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(node) = self.pending.take() {
            match node {
                Node::Empty => {}
                Node::Fragment(nodes) => self.stack.push(nodes.iter()),
                _ => return Some(node),
            }
        }

        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some(Node::Empty) => {}
                Some(Node::Fragment(nodes)) => self.stack.push(nodes.iter()),
                Some(node) => return Some(node),
            }
        }
    }
}

/// Iterate the renderable leaves of `node` without allocating the result
pub fn renderables(node: &Node) -> Renderables<'_> {
    Renderables {
        stack: Vec::new(),
        pending: Some(node),
    }
}

/// Collect the renderable leaves of `node` in order
pub fn flatten(node: &Node) -> Vec<&Node> {
    let mut acc = Vec::new();
    flatten_into(node, &mut acc);
    acc
}

/// Append the renderable leaves of `node` to an existing accumulator
pub fn flatten_into<'a>(node: &'a Node, acc: &mut Vec<&'a Node>) {
    acc.extend(renderables(node));
}

/// Like [`flatten`], keeping only elements
pub fn elements_only(node: &Node) -> Vec<&Element> {
    renderables(node).filter_map(Node::as_element).collect()
}

/// Coerce node content to text
///
/// This is the one place where loose text content is stringified: empty nodes
/// become `""`, numbers use script-style formatting, fragments concatenate their
/// text leaves and elements contribute nothing.
pub fn coerce_text(node: &Node) -> String {
    renderables(node)
        .filter_map(Node::as_text)
        .map(|leaf| leaf.to_string())
        .collect()
}
