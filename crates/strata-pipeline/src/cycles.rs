//! Global cycle tagging over the leaf dependency graph

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use strata_core::{Declaration, NodePath};

/// For every leaf, the set of dependency targets that sit on a cycle with it.
#[derive(Debug, Default)]
pub struct CyclicEdges {
    by_source: HashMap<NodePath, HashSet<NodePath>>,
}

impl CyclicEdges {
    pub fn is_cyclic(&self, source: &NodePath, target: &NodePath) -> bool {
        self.by_source
            .get(source)
            .map(|targets| targets.contains(target))
            .unwrap_or(false)
    }

    pub fn edge_count(&self) -> usize {
        self.by_source.values().map(HashSet::len).sum()
    }
}

/// Compute, once for the whole project, which leaf edges are cyclic: an edge
/// source → target is cyclic iff the graph also contains a path back from the
/// target to the source. With the edge itself present, that is exactly mutual
/// reachability, so both endpoints lie in the same strongly connected
/// component.
pub fn detect_cycles(declarations: &[Declaration]) -> CyclicEdges {
    let mut graph: DiGraph<&NodePath, ()> = DiGraph::new();
    let mut indices: HashMap<&NodePath, NodeIndex> = HashMap::new();

    for declaration in declarations {
        let index = *indices
            .entry(&declaration.id)
            .or_insert_with(|| graph.add_node(&declaration.id));
        for target in declaration.resolved.internal.keys() {
            let target_index = *indices
                .entry(target)
                .or_insert_with(|| graph.add_node(target));
            graph.add_edge(index, target_index, ());
        }
    }

    let mut component_of: HashMap<NodeIndex, usize> = HashMap::new();
    let mut multi_node_components: HashSet<usize> = HashSet::new();
    for (component, members) in tarjan_scc(&graph).into_iter().enumerate() {
        if members.len() > 1 {
            multi_node_components.insert(component);
        }
        for member in members {
            component_of.insert(member, component);
        }
    }

    let mut cyclic = CyclicEdges::default();
    for declaration in declarations {
        let source_component = component_of[&indices[&declaration.id]];
        if !multi_node_components.contains(&source_component) {
            continue;
        }
        for target in declaration.resolved.internal.keys() {
            if component_of[&indices[target]] == source_component {
                cyclic
                    .by_source
                    .entry(declaration.id.clone())
                    .or_default()
                    .insert(target.clone());
            }
        }
    }

    tracing::debug!(
        components = multi_node_components.len(),
        cyclic_edges = cyclic.edge_count(),
        "cycle detection finished"
    );
    cyclic
}
