//! Projection of the full graph onto the currently visible nodes and edges

use std::collections::HashSet;

use strata_core::path::parent_id;
use strata_core::StructuralError;

use crate::edges::{classify_and_filter, ClassifiedEdge, Edge};
use crate::model::{GraphModel, GraphNode};
use crate::state::ViewState;

/// Every node whose parent is a root or expanded, skipping hidden subtrees
/// entirely. Depth first, so parents precede their children.
pub fn visible_nodes<'a>(model: &'a GraphModel, state: &ViewState) -> Vec<&'a GraphNode> {
    let mut visible = Vec::new();
    for root in model.roots() {
        collect_visible(model, state, root, &mut visible);
    }
    visible
}

fn collect_visible<'a>(
    model: &'a GraphModel,
    state: &ViewState,
    id: &str,
    visible: &mut Vec<&'a GraphNode>,
) {
    if state.is_hidden(id) {
        return;
    }
    let node = model.get(id);
    visible.push(node);
    if state.is_expanded(id) {
        for child in &node.children {
            collect_visible(model, state, child, visible);
        }
    }
}

/// Materialize the raw edges of the current view: every visible node without
/// visible children emits its aggregated dependencies, each retargeted to the
/// nearest visible ancestor of its literal target. Expanded containers rely on
/// their descendants to emit, so no duplicate container edges arise.
pub fn visible_edges(model: &GraphModel, state: &ViewState) -> Vec<Edge> {
    let nodes = visible_nodes(model, state);
    let visible_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let mut edges = Vec::new();
    for node in &nodes {
        if has_visible_child(node, &visible_ids) {
            continue;
        }
        for dependency in &node.dependencies {
            let Some(target) = retarget(&dependency.target, &visible_ids, state) else {
                continue;
            };
            // A target that contains its own source would draw a box onto
            // itself; containment is already shown by nesting.
            if model.is_ancestor_or_self(&target, &node.id) {
                continue;
            }
            edges.push(Edge {
                source: node.id.clone(),
                target,
                is_cyclic: dependency.is_cyclic,
                weight: dependency.weight,
                usage_type: dependency.usage_type.clone(),
            });
        }
    }
    edges
}

/// Classified and filtered edges for the current snapshot, ready to render.
pub fn projected_edges(
    model: &GraphModel,
    state: &ViewState,
) -> Result<Vec<ClassifiedEdge>, StructuralError> {
    classify_and_filter(
        model,
        visible_edges(model, state),
        state.filter,
        state.hovered.as_deref(),
    )
}

/// Walk the target's prefix chain up to the nearest visible ancestor. An
/// explicitly hidden id anywhere on the chain terminates the walk: hiding a
/// container suppresses edges into it rather than rerouting them around it.
fn retarget(target: &str, visible_ids: &HashSet<&str>, state: &ViewState) -> Option<String> {
    let mut current = target;
    loop {
        if state.is_hidden(current) {
            return None;
        }
        if visible_ids.contains(current) {
            return Some(current.to_string());
        }
        current = parent_id(current)?;
    }
}

fn has_visible_child(node: &GraphNode, visible_ids: &HashSet<&str>) -> bool {
    node.children
        .iter()
        .any(|child| visible_ids.contains(child.as_str()))
}

/// Every leaf-level dependency classified against the full tree, keeping only
/// the feedback class. This ignores visibility so the list is stable while the
/// user expands and collapses.
pub fn feedback_leaf_edges(model: &GraphModel) -> Result<Vec<Edge>, StructuralError> {
    let mut feedback = Vec::new();
    for node in model.nodes().filter(|n| n.is_leaf()) {
        for dependency in &node.dependencies {
            if !model.contains(&dependency.target) {
                continue;
            }
            let edge = Edge {
                source: node.id.clone(),
                target: dependency.target.clone(),
                is_cyclic: dependency.is_cyclic,
                weight: dependency.weight,
                usage_type: dependency.usage_type.clone(),
            };
            if edge.classify(model)? == crate::edges::EdgeClass::Feedback {
                feedback.push(edge);
            }
        }
    }
    feedback.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
    Ok(feedback)
}

/// Like [`feedback_leaf_edges`], but dropping edges with a hidden endpoint or
/// a hidden ancestor on either side.
pub fn visible_feedback_leaf_edges(
    model: &GraphModel,
    state: &ViewState,
) -> Result<Vec<Edge>, StructuralError> {
    let feedback = feedback_leaf_edges(model)?;
    Ok(feedback
        .into_iter()
        .filter(|edge| {
            !has_hidden_ancestor(model, state, &edge.source)
                && !has_hidden_ancestor(model, state, &edge.target)
        })
        .collect())
}

fn has_hidden_ancestor(model: &GraphModel, state: &ViewState, id: &str) -> bool {
    let mut current = Some(id.to_string());
    while let Some(id) = current {
        if state.is_hidden(&id) {
            return true;
        }
        current = model.get(&id).parent.clone();
    }
    false
}
