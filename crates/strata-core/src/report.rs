//! The persisted project report, the boundary between the batch and interactive halves

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;

/// Aggregated information about one dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeInfo {
    pub is_cyclic: bool,
    pub weight: u32,
    /// Comma-joined usage kinds of the contributing references. Serialized
    /// under the bare key `type` in the persisted document.
    #[serde(default, rename = "type")]
    pub usage_type: String,
}

/// One node of the package/container tree. Leaves carry their id in `leaf_id`;
/// container ids are reconstructed from the parent chain on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTreeNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ProjectTreeNode>,
    pub level: u32,
    /// Transitive set of leaf ids inside this subtree.
    pub contained_leaves: Vec<String>,
    /// Dependencies escaping this subtree, keyed by full target leaf id.
    pub contained_internal_dependencies: BTreeMap<String, EdgeInfo>,
}

impl ProjectTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Per-leaf details kept outside the tree so the tree stays light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafInfo {
    pub id: String,
    pub name: String,
    pub physical_path: String,
    pub node_type: String,
    pub language: String,
    pub dependencies: BTreeMap<String, EdgeInfo>,
}

/// The full persisted document. Must round-trip losslessly through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_tree_roots: Vec<ProjectTreeNode>,
    pub leaves: BTreeMap<String, LeafInfo>,
}

impl ProjectReport {
    pub fn to_json(&self) -> Result<String, StructuralError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and structurally validate a persisted report.
    pub fn from_json(json: &str) -> Result<Self, StructuralError> {
        let report: ProjectReport = serde_json::from_str(json)?;
        report.validate()?;
        Ok(report)
    }

    /// Check the containment contract: every leaf id the tree mentions must be
    /// present in the leaves table, and sibling names must be unique (two
    /// siblings with one name would collapse into the same dotted id).
    pub fn validate(&self) -> Result<(), StructuralError> {
        for root in &self.project_tree_roots {
            self.validate_node(root)?;
        }
        tracing::debug!(
            roots = self.project_tree_roots.len(),
            leaves = self.leaves.len(),
            "project report validated"
        );
        Ok(())
    }

    fn validate_node(&self, node: &ProjectTreeNode) -> Result<(), StructuralError> {
        if let Some(leaf_id) = &node.leaf_id {
            if !self.leaves.contains_key(leaf_id) {
                return Err(StructuralError::MissingLeaf(leaf_id.clone()));
            }
        }
        for leaf_id in &node.contained_leaves {
            if !self.leaves.contains_key(leaf_id) {
                return Err(StructuralError::MissingLeaf(leaf_id.clone()));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for child in &node.children {
            if !seen.insert(child.name.as_str()) {
                return Err(StructuralError::DuplicateChild {
                    parent: node.name.clone(),
                    name: child.name.clone(),
                });
            }
            self.validate_node(child)?;
        }
        Ok(())
    }

    /// Total number of tree nodes, containers included.
    pub fn node_count(&self) -> usize {
        fn count(node: &ProjectTreeNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.project_tree_roots.iter().map(count).sum()
    }
}
