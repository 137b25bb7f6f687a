//! Core node types for the virtual tree

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A node in the virtual tree
///
/// `Empty` stands in for null, undefined and boolean children; it renders nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Empty,
    /// Raw text or number content
    Text(TextLeaf),
    /// A tagged element with props
    Element(Element),
    /// An ordered sequence of nodes inlined into its parent
    Fragment(Vec<Node>),
}

impl Node {
    /// True iff this node is an element, whatever its tag kind
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLeaf> {
        match self {
            Node::Text(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// True for nodes that contribute nothing once flattened
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Empty => true,
            Node::Fragment(nodes) => nodes.iter().all(Node::is_empty),
            _ => false,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

impl From<Vec<Element>> for Node {
    fn from(elements: Vec<Element>) -> Self {
        Node::Fragment(elements.into_iter().map(Node::Element).collect())
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(TextLeaf::Str(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(TextLeaf::Str(s))
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Text(TextLeaf::Num(n))
    }
}

impl From<bool> for Node {
    fn from(_: bool) -> Self {
        Node::Empty
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::Empty)
    }
}

/// Text content of a leaf node
#[derive(Debug, Clone, PartialEq)]
pub enum TextLeaf {
    Str(String),
    Num(f64),
}

impl fmt::Display for TextLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextLeaf::Str(s) => f.write_str(s),
            TextLeaf::Num(n) => f.write_str(&format_number(*n)),
        }
    }
}

/// Format a number the way script engines stringify them (`3`, `1.5`, `NaN`, `Infinity`)
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        // covers -0.0
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// A tagged element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub props: Props,
    pub key: Option<String>,
}

impl Element {
    pub fn new(tag: Tag, props: Props) -> Self {
        Self {
            tag,
            props,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The primitive tag name, if this element has one
    pub fn tag_name(&self) -> Option<&str> {
        match &self.tag {
            Tag::Primitive(name) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_defs(&self) -> bool {
        matches!(self.tag, Tag::Reserved(Reserved::Defs))
    }

    pub fn is_component(&self) -> bool {
        matches!(self.tag, Tag::Component(_))
    }

    pub fn children(&self) -> &Node {
        &*self.props.children
    }
}

/// The kind of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// A markup tag name such as `rect`, `g` or `text`
    Primitive(String),
    /// A construct handled by the pipeline itself
    Reserved(Reserved),
    /// A function producing another node from props
    Component(Component),
}

impl Tag {
    pub fn primitive(name: impl Into<String>) -> Self {
        Tag::Primitive(name.into())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Primitive(name) => f.write_str(name),
            Tag::Reserved(Reserved::Defs) => f.write_str("Defs"),
            Tag::Component(c) => write!(f, "<{}>", c.name()),
        }
    }
}

/// Reserved constructs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reserved {
    /// Shared resource declarations hoisted to the root `<defs>`
    Defs,
}

type RenderFn = dyn Fn(&Props) -> Node + Send + Sync;

/// A named component function
///
/// Two components are equal only if they share the same function instance.
#[derive(Clone)]
pub struct Component {
    name: Arc<str>,
    render: Arc<RenderFn>,
}

impl Component {
    pub fn new<F>(name: impl Into<Arc<str>>, render: F) -> Self
    where
        F: Fn(&Props) -> Node + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Arc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the component with the given props
    pub fn call(&self, props: &Props) -> Node {
        (self.render)(props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render, &other.render)
    }
}

/// An attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl AttrValue {
    /// Numeric view of the value; numeric strings are accepted
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Num(n) => Some(*n),
            AttrValue::Str(s) => s.trim().parse().ok(),
            AttrValue::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Num(n) => f.write_str(&format_number(*n)),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Num(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Num(f64::from(n))
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Element props: ordered attributes plus children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Props {
    attrs: IndexMap<String, AttrValue>,
    pub children: Box<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style children setter
    pub fn with_children(mut self, children: impl Into<Node>) -> Self {
        self.children = Box::new(children.into());
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Remove an attribute, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.shift_remove(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttrValue::as_f64)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    /// Iterate attributes in insertion order
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
