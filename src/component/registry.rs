//! Named component registry for trees loaded from serialized documents

use std::collections::HashMap;

use thiserror::Error;

use crate::node::{Component, Node, Props};

/// Errors that can occur while registering or expanding components
#[derive(Debug, Error, PartialEq)]
pub enum ComponentError {
    /// Component chain nested deeper than the configured limit
    #[error("component '{component}' exceeded the maximum expansion depth of {depth}")]
    DepthExceeded { component: String, depth: usize },

    /// Duplicate component definition
    #[error("duplicate component definition: {name}")]
    Duplicate { name: String },
}

/// Registry of components addressable by name
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its own name
    pub fn register(&mut self, component: Component) -> Result<(), ComponentError> {
        let name = component.name().to_string();
        if self.components.contains_key(&name) {
            return Err(ComponentError::Duplicate { name });
        }
        self.components.insert(name, component);
        Ok(())
    }

    /// Register a closure as a named component
    pub fn register_fn<F>(&mut self, name: &str, render: F) -> Result<(), ComponentError>
    where
        F: Fn(&Props) -> Node + Send + Sync + 'static,
    {
        self.register(Component::new(name, render))
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = ComponentRegistry::new();
        registry.register_fn("Badge", |_| Node::from("badge")).unwrap();

        assert!(registry.contains("Badge"));
        assert_eq!(registry.len(), 1);
        let badge = registry.get("Badge").unwrap();
        assert_eq!(badge.call(&Props::new()), Node::from("badge"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register_fn("Badge", |_| Node::Empty).unwrap();
        let err = registry.register_fn("Badge", |_| Node::Empty).unwrap_err();
        assert_eq!(
            err,
            ComponentError::Duplicate {
                name: "Badge".to_string()
            }
        );
    }

    #[test]
    fn test_depth_error_display() {
        let err = ComponentError::DepthExceeded {
            component: "Loop".to_string(),
            depth: 64,
        };
        assert!(err.to_string().contains("Loop"));
        assert!(err.to_string().contains("64"));
    }
}
