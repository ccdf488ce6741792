//! Edge classification and filtering

use std::collections::BTreeMap;

use strata_core::StructuralError;

use crate::model::GraphModel;

/// The four edge classes. "Points upward" compares the levels of the lowest
/// common ancestor sibling pair: an edge into a same-or-deeper sibling subtree
/// runs against the layering and is the architecturally surprising kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    Regular,
    Cyclic,
    Twisted,
    Feedback,
}

/// Which edge classes the view currently shows. `FeedbackLeafLevelOnly`
/// additionally restricts the feedback class to edges between two leaves,
/// excluding the ones aggregated up onto containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeFilter {
    None,
    All,
    CyclesOnly,
    FeedbackOnly,
    FeedbackAndTwisted,
    FeedbackLeafLevelOnly,
    #[default]
    AllFeedback,
}

impl EdgeFilter {
    pub fn admits(&self, class: EdgeClass) -> bool {
        match self {
            EdgeFilter::None => false,
            EdgeFilter::All => true,
            EdgeFilter::CyclesOnly => matches!(class, EdgeClass::Cyclic | EdgeClass::Feedback),
            EdgeFilter::FeedbackOnly
            | EdgeFilter::FeedbackLeafLevelOnly
            | EdgeFilter::AllFeedback => {
                matches!(class, EdgeClass::Feedback)
            }
            EdgeFilter::FeedbackAndTwisted => {
                matches!(class, EdgeClass::Feedback | EdgeClass::Twisted)
            }
        }
    }

    /// Whether duplicate (source, target) pairs collapse into one edge. The
    /// cyclicity-focused filters keep differently-tagged duplicates distinct.
    pub fn merges_duplicates(&self) -> bool {
        !matches!(
            self,
            EdgeFilter::CyclesOnly | EdgeFilter::FeedbackOnly | EdgeFilter::FeedbackLeafLevelOnly
        )
    }
}

/// A materialized edge between two visible nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub is_cyclic: bool,
    pub weight: u32,
    pub usage_type: String,
}

impl Edge {
    pub fn classify(&self, model: &GraphModel) -> Result<EdgeClass, StructuralError> {
        classify(model, &self.source, &self.target, self.is_cyclic)
    }
}

/// An edge together with its computed class, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEdge {
    pub edge: Edge,
    pub class: EdgeClass,
}

pub fn classify(
    model: &GraphModel,
    source: &str,
    target: &str,
    is_cyclic: bool,
) -> Result<EdgeClass, StructuralError> {
    let upward = points_upward(model, source, target)?;
    Ok(match (is_cyclic, upward) {
        (false, false) => EdgeClass::Regular,
        (true, false) => EdgeClass::Cyclic,
        (false, true) => EdgeClass::Twisted,
        (true, true) => EdgeClass::Feedback,
    })
}

/// Compare levels at the lowest common ancestor sibling pair, making the level
/// comparison local rather than global.
fn points_upward(model: &GraphModel, source: &str, target: &str) -> Result<bool, StructuralError> {
    let (source_sibling, target_sibling) = sibling_pair(model, source, target)?;
    Ok(model.get(&source_sibling).level <= model.get(&target_sibling).level)
}

/// Walk both ancestor chains outward until their parents match. Two roots
/// count as siblings under the implicit forest root.
fn sibling_pair(
    model: &GraphModel,
    source: &str,
    target: &str,
) -> Result<(String, String), StructuralError> {
    let source_chain = ancestor_chain(model, source)?;
    let target_chain = ancestor_chain(model, target)?;

    for source_ancestor in &source_chain {
        for target_ancestor in &target_chain {
            if model.get(source_ancestor).parent == model.get(target_ancestor).parent {
                return Ok((source_ancestor.clone(), target_ancestor.clone()));
            }
        }
    }
    Err(StructuralError::NoCommonAncestor {
        source_id: source.to_string(),
        target_id: target.to_string(),
    })
}

/// The node itself and every ancestor, innermost first.
fn ancestor_chain(model: &GraphModel, id: &str) -> Result<Vec<String>, StructuralError> {
    let mut chain = vec![id.to_string()];
    let mut node = model.get(id);
    while let Some(parent) = node.parent.clone() {
        let child = node.id.clone();
        node = model.try_get(&parent).ok_or(StructuralError::DanglingParent {
            child,
            parent: parent.clone(),
        })?;
        chain.push(parent);
    }
    Ok(chain)
}

/// Apply the active filter to a batch of raw edges: merge duplicates according
/// to the filter's merge rule, classify, keep admitted classes. Edges incident
/// to the hovered node bypass the class filter.
pub fn classify_and_filter(
    model: &GraphModel,
    edges: Vec<Edge>,
    filter: EdgeFilter,
    hovered: Option<&str>,
) -> Result<Vec<ClassifiedEdge>, StructuralError> {
    let merged = merge_edges(edges, filter.merges_duplicates());

    let mut result = Vec::new();
    for edge in merged {
        let class = edge.classify(model)?;
        let admitted = filter.admits(class)
            && (filter != EdgeFilter::FeedbackLeafLevelOnly || is_leaf_level(model, &edge));
        let incident_to_hover =
            hovered.is_some_and(|id| edge.source == id || edge.target == id);
        if admitted || incident_to_hover {
            result.push(ClassifiedEdge { edge, class });
        }
    }
    Ok(result)
}

/// An edge is leaf level when neither endpoint is an aggregated container.
fn is_leaf_level(model: &GraphModel, edge: &Edge) -> bool {
    model.get(&edge.source).is_leaf() && model.get(&edge.target).is_leaf()
}

/// Merge duplicate pairs: weights summed, cyclicity OR-combined, usage kinds
/// union-joined. With `by_pair` off, the pair key also carries the cyclic tag.
fn merge_edges(edges: Vec<Edge>, by_pair: bool) -> Vec<Edge> {
    let mut merged: BTreeMap<(String, String, bool), Edge> = BTreeMap::new();
    for edge in edges {
        let key = (
            edge.source.clone(),
            edge.target.clone(),
            if by_pair { false } else { edge.is_cyclic },
        );
        merged
            .entry(key)
            .and_modify(|existing| {
                existing.weight += edge.weight;
                existing.is_cyclic |= edge.is_cyclic;
                existing.usage_type = merge_usage_types(&existing.usage_type, &edge.usage_type);
            })
            .or_insert(edge);
    }
    merged.into_values().collect()
}

fn merge_usage_types(left: &str, right: &str) -> String {
    let mut kinds: std::collections::BTreeSet<&str> =
        left.split(',').filter(|k| !k.is_empty()).collect();
    kinds.extend(right.split(',').filter(|k| !k.is_empty()));
    kinds.into_iter().collect::<Vec<_>>().join(",")
}
