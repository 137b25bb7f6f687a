//! Element construction helpers, one per primitive shape

use super::types::{Component, Element, Node, Props, Reserved, Tag};

/// Build an element with a primitive tag name
pub fn element(tag: impl Into<String>, props: Props) -> Element {
    Element::new(Tag::Primitive(tag.into()), props)
}

/// `<g>` container
pub fn group(props: Props) -> Element {
    element("g", props)
}

pub fn rect(props: Props) -> Element {
    element("rect", props)
}

pub fn ellipse(props: Props) -> Element {
    element("ellipse", props)
}

pub fn path(props: Props) -> Element {
    element("path", props)
}

/// Text box; `content` becomes the element's children
pub fn text(props: Props, content: impl Into<Node>) -> Element {
    element("text", props.with_children(content))
}

/// Declarations hoisted into the single root `<defs>` block
pub fn defs(children: impl Into<Node>) -> Element {
    Element::new(
        Tag::Reserved(Reserved::Defs),
        Props::new().with_children(children),
    )
}

/// Instantiate a component with props
pub fn component(component: &Component, props: Props) -> Element {
    Element::new(Tag::Component(component.clone()), props)
}

/// Shallow derivative of `el` with overridden props
///
/// Attributes in `overrides` replace existing ones (new names are appended);
/// non-empty override children replace the original children. The source
/// element is left untouched.
pub fn clone_element(el: &Element, overrides: Props) -> Element {
    let mut props = el.props.clone();
    for (name, value) in overrides.attrs() {
        props.set(name, value.clone());
    }
    if !overrides.children.is_empty() {
        props.children = overrides.children;
    }
    Element {
        tag: el.tag.clone(),
        props,
        key: el.key.clone(),
    }
}
