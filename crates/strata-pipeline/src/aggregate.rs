//! Bottom-up folding of leaf dependencies into the package hierarchy

use std::collections::{BTreeMap, BTreeSet};

use strata_core::{Declaration, EdgeInfo, LeafInfo, ProjectReport, ProjectTreeNode};

use crate::cycles::CyclicEdges;

/// Build the persisted report: one container per distinct path prefix, leaves
/// attached to their deepest container, weights and cyclicity rolled up.
/// Non-destructive; the declarations are only read.
pub fn aggregate(declarations: &[Declaration], cyclic: &CyclicEdges) -> ProjectReport {
    let mut sorted: Vec<&Declaration> = declarations.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let leaves: BTreeMap<String, LeafInfo> = sorted
        .iter()
        .map(|declaration| {
            (
                declaration.id.dotted(),
                LeafInfo {
                    id: declaration.id.dotted(),
                    name: declaration.name().to_string(),
                    physical_path: declaration.physical_path.clone(),
                    node_type: declaration.kind.as_str().to_string(),
                    language: declaration.language.as_str().to_string(),
                    dependencies: leaf_dependencies(declaration, cyclic),
                },
            )
        })
        .collect();

    let roots = build_subtree(None, 0, &sorted, cyclic);
    tracing::info!(
        leaves = leaves.len(),
        roots = roots.len(),
        "aggregated project tree"
    );
    ProjectReport {
        project_tree_roots: roots,
        leaves,
    }
}

/// A leaf edge weighs 1 per distinct target, however many type references
/// contributed; the usage label collects every contributing kind.
fn leaf_dependencies(declaration: &Declaration, cyclic: &CyclicEdges) -> BTreeMap<String, EdgeInfo> {
    declaration
        .resolved
        .internal
        .keys()
        .map(|target| {
            (
                target.dotted(),
                EdgeInfo {
                    is_cyclic: cyclic.is_cyclic(&declaration.id, target),
                    weight: 1,
                    usage_type: declaration.resolved.usage_label(target),
                },
            )
        })
        .collect()
}

fn build_subtree(
    parent_id: Option<&str>,
    depth: usize,
    declarations: &[&Declaration],
    cyclic: &CyclicEdges,
) -> Vec<ProjectTreeNode> {
    let mut nodes = Vec::new();

    for declaration in declarations.iter().filter(|d| d.id.len() == depth + 1) {
        let id = declaration.id.dotted();
        nodes.push(ProjectTreeNode {
            leaf_id: Some(id.clone()),
            name: declaration.name().to_string(),
            children: Vec::new(),
            level: 0,
            contained_leaves: vec![id],
            contained_internal_dependencies: leaf_dependencies(declaration, cyclic),
        });
    }

    let mut groups: BTreeMap<&str, Vec<&Declaration>> = BTreeMap::new();
    for declaration in declarations.iter().filter(|d| d.id.len() > depth + 1) {
        groups
            .entry(declaration.id.parts()[depth].as_str())
            .or_default()
            .push(*declaration);
    }

    for (segment, group) in groups {
        let container_id = match parent_id {
            Some(parent) => format!("{parent}.{segment}"),
            None => segment.to_string(),
        };
        let children = build_subtree(Some(&container_id), depth + 1, &group, cyclic);
        let level = 1 + children.iter().map(|c| c.level).max().unwrap_or(0);

        let contained: BTreeSet<String> = children
            .iter()
            .flat_map(|c| c.contained_leaves.iter().cloned())
            .collect();

        // Fold every leaf edge escaping this container. Edges whose target is
        // also inside stay invisible until an ancestor where the target
        // finally escapes.
        let mut dependencies: BTreeMap<String, EdgeInfo> = BTreeMap::new();
        for declaration in &group {
            for target in declaration.resolved.internal.keys() {
                let target_id = target.dotted();
                if contained.contains(&target_id) {
                    continue;
                }
                let is_cyclic = cyclic.is_cyclic(&declaration.id, target);
                let label = declaration.resolved.usage_label(target);
                dependencies
                    .entry(target_id)
                    .and_modify(|edge| {
                        edge.weight += 1;
                        edge.is_cyclic |= is_cyclic;
                        edge.usage_type = merge_usage_labels(&edge.usage_type, &label);
                    })
                    .or_insert(EdgeInfo {
                        is_cyclic,
                        weight: 1,
                        usage_type: label,
                    });
            }
        }

        nodes.push(ProjectTreeNode {
            leaf_id: None,
            name: segment.to_string(),
            children,
            level,
            contained_leaves: contained.into_iter().collect(),
            contained_internal_dependencies: dependencies,
        });
    }

    nodes
}

fn merge_usage_labels(left: &str, right: &str) -> String {
    let mut kinds: BTreeSet<&str> = left.split(',').collect();
    kinds.extend(right.split(','));
    kinds.into_iter().collect::<Vec<_>>().join(",")
}
