//! Loading node trees from JSON documents
//!
//! A document is any JSON value. `null` and booleans render nothing, strings
//! and numbers are text, arrays are fragments and objects carrying a `type`
//! field are elements:
//!
//! ```json
//! { "type": "g", "props": { "fill": "red", "children": [
//!     { "type": "Defs", "props": { "children": { "type": "linearGradient", "props": { "id": "a" } } } },
//!     { "type": "text", "props": { "x": 10, "children": "Hello" } }
//! ] } }
//! ```
//!
//! `"Defs"` names the reserved definitions construct. Names registered in a
//! [`ComponentRegistry`] become component calls; anything else is a markup tag.

use serde_json::{Map, Value};

use crate::component::ComponentRegistry;
use crate::error::LoadError;
use crate::node::{AttrValue, Element, Node, Props, Reserved, Tag, TextLeaf};

const DEFS_TYPE: &str = "Defs";

/// True iff `value` is an object carrying a `type` field, whatever its value
pub fn is_element_value(value: &Value) -> bool {
    value.as_object().map_or(false, |obj| obj.contains_key("type"))
}

/// Parse a JSON document into a node tree
pub fn parse(source: &str, registry: &ComponentRegistry) -> Result<Node, LoadError> {
    let value: Value = serde_json::from_str(source).map_err(|e| LoadError::from_json(&e, source))?;
    Ok(node_from_value(&value, registry))
}

/// Convert an already parsed JSON value into a node tree
pub fn node_from_value(value: &Value, registry: &ComponentRegistry) -> Node {
    match value {
        Value::Null | Value::Bool(_) => Node::Empty,
        Value::String(s) => Node::Text(TextLeaf::Str(s.clone())),
        Value::Number(n) => Node::Text(TextLeaf::Num(n.as_f64().unwrap_or(f64::NAN))),
        Value::Array(items) => Node::Fragment(
            items
                .iter()
                .map(|item| node_from_value(item, registry))
                .collect(),
        ),
        Value::Object(obj) => match element_from_object(obj, registry) {
            Some(el) => Node::Element(el),
            None => {
                log::warn!("Treating malformed node {} as text.", value);
                Node::Text(TextLeaf::Str(value.to_string()))
            }
        },
    }
}

fn element_from_object(obj: &Map<String, Value>, registry: &ComponentRegistry) -> Option<Element> {
    let tag = match obj.get("type")? {
        Value::String(name) if name == DEFS_TYPE => Tag::Reserved(Reserved::Defs),
        Value::String(name) => match registry.get(name) {
            Some(component) => Tag::Component(component.clone()),
            None => Tag::primitive(name.as_str()),
        },
        _ => return None,
    };

    let mut props = Props::new();
    if let Some(raw) = obj.get("props") {
        match raw {
            Value::Object(raw) => {
                for (name, value) in raw {
                    if name == "children" {
                        props.children = Box::new(node_from_value(value, registry));
                    } else if let Some(value) = attr_value(name, value) {
                        props.set(name.as_str(), value);
                    }
                }
            }
            Value::Null => {}
            other => log::warn!("Ignoring non-object props {}.", other),
        }
    }

    let mut el = Element::new(tag, props);
    match obj.get("key") {
        Some(Value::String(key)) => el = el.with_key(key.as_str()),
        Some(Value::Number(key)) => el = el.with_key(key.to_string()),
        _ => {}
    }
    Some(el)
}

fn attr_value(name: &str, value: &Value) -> Option<AttrValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(AttrValue::Bool(*b)),
        Value::Number(n) => n.as_f64().map(AttrValue::Num),
        Value::String(s) => Some(AttrValue::Str(s.clone())),
        other => {
            log::warn!("Prop '{}' is not a scalar; keeping its JSON text.", name);
            Some(AttrValue::Str(other.to_string()))
        }
    }
}
