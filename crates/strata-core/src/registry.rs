//! In-memory index of all extracted declarations

use std::collections::HashMap;

use crate::model::Declaration;
use crate::path::NodePath;

/// Index over all declarations, keyed by id and by simple name.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    by_id: HashMap<NodePath, Declaration>,
    by_simple_name: HashMap<String, Vec<NodePath>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        NodeRegistry::default()
    }

    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut registry = NodeRegistry::new();
        for declaration in declarations {
            registry.insert(declaration);
        }
        registry
    }

    /// Insert a declaration. A later declaration with the same id replaces the
    /// earlier one.
    pub fn insert(&mut self, declaration: Declaration) {
        let id = declaration.id.clone();
        let name = declaration.name().to_string();
        if self.by_id.insert(id.clone(), declaration).is_none() {
            self.by_simple_name.entry(name).or_default().push(id);
        }
    }

    pub fn get(&self, id: &NodePath) -> Option<&Declaration> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &NodePath) -> bool {
        self.by_id.contains_key(id)
    }

    /// All ids sharing a simple name, in insertion order.
    pub fn ids_with_simple_name(&self, name: &str) -> &[NodePath] {
        self.by_simple_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
