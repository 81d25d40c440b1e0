//! Node type registry.
//!
//! Maps type identifiers to template factories plus an optional human
//! alias. An alias is a second lookup key, so `create("Backdrop")` works
//! once the backdrop type is registered under that alias.

use crate::core::error::{GraphError, GraphResult};
use crate::core::node::Node;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Factory function producing a fresh node instance for a type.
pub type NodeTemplate = Arc<dyn Fn() -> GraphResult<Node> + Send + Sync>;

/// Registry entry containing the template and its alias.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub template: NodeTemplate,
    /// Optional human alias, usable as a second create key.
    pub alias: Option<String>,
}

/// Registry for all available node types.
///
/// Uses IndexMap so iteration follows registration order.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    types: IndexMap<String, RegistryEntry>,
}

impl NodeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in node types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::nodes::builtin::register_all(&mut registry);
        registry
    }

    /// Register a node type.
    ///
    /// Fails with `DuplicateTypeIdentifier` when the type id (or the alias,
    /// used as a create key) is already taken.
    pub fn register<F>(
        &mut self,
        type_id: impl Into<String>,
        template: F,
        alias: Option<&str>,
    ) -> GraphResult<()>
    where
        F: Fn() -> GraphResult<Node> + Send + Sync + 'static,
    {
        let type_id = type_id.into();
        if self.resolve(&type_id).is_some() {
            return Err(GraphError::DuplicateTypeIdentifier(type_id));
        }
        if let Some(alias) = alias {
            if self.resolve(alias).is_some() {
                return Err(GraphError::DuplicateTypeIdentifier(alias.to_string()));
            }
        }

        self.types.insert(
            type_id,
            RegistryEntry {
                template: Arc::new(template),
                alias: alias.map(str::to_string),
            },
        );
        Ok(())
    }

    /// Create a new node instance by type id or alias.
    ///
    /// The returned node carries the canonical type id regardless of which
    /// key was used.
    pub fn create(&self, key: &str) -> GraphResult<Node> {
        let (type_id, entry) = self
            .resolve(key)
            .ok_or_else(|| GraphError::UnregisteredType(key.to_string()))?;

        let mut node = (entry.template)()?;
        node.type_id = type_id.to_string();
        Ok(node)
    }

    /// Check if a type id or alias is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_some()
    }

    /// The alias registered for a type id, if any.
    pub fn alias(&self, type_id: &str) -> Option<&str> {
        self.types.get(type_id).and_then(|e| e.alias.as_deref())
    }

    /// All registered type ids, in registration order.
    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|s| s.as_str())
    }

    /// All registry entries, in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn resolve(&self, key: &str) -> Option<(&str, &RegistryEntry)> {
        if let Some((type_id, entry)) = self.types.get_key_value(key) {
            return Some((type_id.as_str(), entry));
        }
        self.types
            .iter()
            .find(|(_, entry)| entry.alias.as_deref() == Some(key))
            .map(|(type_id, entry)| (type_id.as_str(), entry))
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay_template() -> GraphResult<Node> {
        let mut node = Node::new("test.relay", "relay");
        node.add_input("in")?;
        node.add_output("out")?;
        Ok(node)
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = NodeRegistry::new();
        registry
            .register("test.relay", relay_template, None)
            .unwrap();

        assert!(registry.contains("test.relay"));
        let node = registry.create("test.relay").unwrap();
        assert_eq!(node.type_id, "test.relay");
        assert_eq!(node.inputs().len(), 1);
    }

    #[test]
    fn test_duplicate_type_identifier() {
        let mut registry = NodeRegistry::new();
        registry
            .register("test.relay", relay_template, None)
            .unwrap();

        let err = registry
            .register("test.relay", relay_template, None)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateTypeIdentifier("test.relay".to_string())
        );
    }

    #[test]
    fn test_create_by_alias() {
        let mut registry = NodeRegistry::new();
        registry
            .register("test.relay", relay_template, Some("Relay"))
            .unwrap();

        let node = registry.create("Relay").unwrap();
        assert_eq!(node.type_id, "test.relay");
        assert_eq!(registry.alias("test.relay"), Some("Relay"));
    }

    #[test]
    fn test_unregistered_type() {
        let registry = NodeRegistry::new();
        let err = registry.create("nope").unwrap_err();
        assert_eq!(err, GraphError::UnregisteredType("nope".to_string()));
    }

    #[test]
    fn test_fresh_ids_per_create() {
        let mut registry = NodeRegistry::new();
        registry
            .register("test.relay", relay_template, None)
            .unwrap();

        let a = registry.create("test.relay").unwrap();
        let b = registry.create("test.relay").unwrap();
        assert_ne!(a.id, b.id);
    }
}
