//! Component system
//!
//! Components are functions from props to nodes. They are resolved in a single
//! dispatch step before layout, so later passes only ever see primitive tags
//! and reserved constructs.
//!
//! # Example
//!
//! ```rust
//! use vnode_svg::component::expand;
//! use vnode_svg::node::{builder, Component, Node, Props};
//!
//! let card = Component::new("Card", |props: &Props| {
//!     let width = props.number("width").unwrap_or(100.0);
//!     Node::from(builder::rect(Props::new().with("width", width).with("height", 40)))
//! });
//!
//! let tree = Node::from(builder::component(&card, Props::new().with("width", 80)));
//! let expanded = expand(&tree, 64).unwrap();
//! assert!(!expanded.is_empty());
//! ```

mod registry;
mod resolver;

pub use registry::{ComponentError, ComponentRegistry};
pub use resolver::expand;
