//! Flat id-indexed view of a loaded project report
//!
//! The tree is held as a central map of stable ids with parent ids instead of
//! live back-pointers; navigable views are reconstructed on demand.

use std::collections::HashMap;

use strata_core::path::contains_id;
use strata_core::{ProjectReport, ProjectTreeNode};

/// One aggregated dependency of a node, as loaded from the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowEdge {
    pub target: String,
    pub is_cyclic: bool,
    pub weight: u32,
    pub usage_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub level: u32,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub dependencies: Vec<ShallowEdge>,
}

impl GraphNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// All nodes of the loaded graph, keyed by id. Container ids are rebuilt from
/// the parent name chain; leaves keep the id persisted with them.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: HashMap<String, GraphNode>,
    roots: Vec<String>,
}

impl GraphModel {
    pub fn from_report(report: &ProjectReport) -> Self {
        let mut model = GraphModel::default();
        for root in &report.project_tree_roots {
            let id = model.insert_subtree(root, None);
            model.roots.push(id);
        }
        tracing::debug!(nodes = model.nodes.len(), roots = model.roots.len(), "graph model built");
        model
    }

    fn insert_subtree(&mut self, node: &ProjectTreeNode, parent: Option<&str>) -> String {
        let id = match &node.leaf_id {
            Some(leaf_id) => leaf_id.clone(),
            None => match parent {
                Some(parent) => format!("{parent}.{}", node.name),
                None => node.name.clone(),
            },
        };
        let children: Vec<String> = node
            .children
            .iter()
            .map(|child| self.insert_subtree(child, Some(&id)))
            .collect();
        let dependencies = node
            .contained_internal_dependencies
            .iter()
            .map(|(target, edge)| ShallowEdge {
                target: target.clone(),
                is_cyclic: edge.is_cyclic,
                weight: edge.weight,
                usage_type: edge.usage_type.clone(),
            })
            .collect();
        self.nodes.insert(
            id.clone(),
            GraphNode {
                id: id.clone(),
                label: node.name.clone(),
                level: node.level,
                parent: parent.map(str::to_string),
                children,
                dependencies,
            },
        );
        id
    }

    /// Look up a node. Interactive callers only ever hold ids drawn from the
    /// loaded graph, so a miss is a programmer error and fails fast.
    pub fn get(&self, id: &str) -> &GraphNode {
        match self.nodes.get(id) {
            Some(node) => node,
            None => panic!("node with id {id} not found"),
        }
    }

    pub fn try_get(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node and everything below it, depth first.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut all = vec![id.to_string()];
        let mut index = 0;
        while index < all.len() {
            let node = self.get(&all[index]);
            all.extend(node.children.iter().cloned());
            index += 1;
        }
        all
    }

    /// Prefix containment doubles as ancestry because ids mirror the tree.
    pub fn is_ancestor_or_self(&self, ancestor: &str, id: &str) -> bool {
        contains_id(ancestor, id)
    }
}
