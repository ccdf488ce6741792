//! View state snapshots and the action reducer
//!
//! Every action produces a fresh snapshot from the previous one; published
//! snapshots are never mutated, so old ones stay safe to re-reduce.

use std::collections::{BTreeMap, BTreeSet};

use strata_core::path::contains_id;

use crate::edges::EdgeFilter;
use crate::model::GraphModel;

/// One immutable snapshot of everything the user has toggled.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub expanded: BTreeSet<String>,
    pub hidden: BTreeSet<String>,
    /// Directly hidden children per parent id, for single-node restore.
    /// Hidden roots appear only in `hidden`.
    pub hidden_children_by_parent: BTreeMap<String, BTreeSet<String>>,
    /// Ids the user pinned directly. Pinning covers all descendants.
    pub pin_roots: BTreeSet<String>,
    /// Everything currently covered by a pin root, the roots included.
    pub pinned: BTreeSet<String>,
    pub hovered: Option<String>,
    pub selected: BTreeSet<String>,
    pub multiselect: bool,
    pub show_edge_labels: bool,
    pub filter: EdgeFilter,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            expanded: BTreeSet::new(),
            hidden: BTreeSet::new(),
            hidden_children_by_parent: BTreeMap::new(),
            pin_roots: BTreeSet::new(),
            pinned: BTreeSet::new(),
            hovered: None,
            selected: BTreeSet::new(),
            multiselect: false,
            show_edge_labels: true,
            filter: EdgeFilter::default(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        ViewState::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains(id)
    }
}

/// The closed set of state transitions the UI can request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Initialize,
    ExpandNode(String),
    CollapseNode(String),
    ChangeFilter(EdgeFilter),
    ShowEdgesOfNode(String),
    HideEdgesOfNode,
    ToggleEdgeLabels,
    HideNode(String),
    RestoreNode(String),
    RestoreChildren(String),
    RestoreAll,
    PinNode(String),
    UnpinNode(String),
    ToggleNodeSelection(String),
    EnterMultiselect,
    LeaveMultiselect,
}

/// Reduce one action against a snapshot. Ids must come from the loaded graph;
/// an unknown id is a programmer error and panics via the model lookup.
pub fn reduce(state: &ViewState, model: &GraphModel, action: Action) -> ViewState {
    let mut next = state.clone();
    match action {
        Action::Initialize => {
            next = ViewState::default();
        }
        Action::ExpandNode(id) => {
            model.get(&id);
            next.expanded.insert(id);
        }
        Action::CollapseNode(id) => {
            // Collapsing also forgets expansions anywhere below, so
            // re-expanding starts from a closed subtree.
            model.get(&id);
            next.expanded.retain(|expanded| !contains_id(&id, expanded));
        }
        Action::ChangeFilter(filter) => {
            next.filter = filter;
        }
        Action::ShowEdgesOfNode(id) => {
            model.get(&id);
            next.hovered = Some(id);
        }
        Action::HideEdgesOfNode => {
            next.hovered = None;
        }
        Action::ToggleEdgeLabels => {
            next.show_edge_labels = !next.show_edge_labels;
        }
        Action::HideNode(id) => {
            let node = model.get(&id);
            if let Some(parent) = &node.parent {
                next.hidden_children_by_parent
                    .entry(parent.clone())
                    .or_default()
                    .insert(id.clone());
            }
            // Only the hidden id loses its pin; descendants of a hidden pin
            // root stay pinned until an explicit unpin recomputes the cover.
            next.pin_roots.remove(&id);
            next.pinned.remove(&id);
            next.selected.remove(&id);
            next.hidden.insert(id);
        }
        Action::RestoreNode(id) => {
            let node = model.get(&id);
            if let Some(parent) = &node.parent {
                if let Some(children) = next.hidden_children_by_parent.get_mut(parent) {
                    children.remove(&id);
                    if children.is_empty() {
                        next.hidden_children_by_parent.remove(parent);
                    }
                }
            }
            next.hidden.remove(&id);
        }
        Action::RestoreChildren(parent) => {
            model.get(&parent);
            if let Some(children) = next.hidden_children_by_parent.remove(&parent) {
                for child in children {
                    next.hidden.remove(&child);
                }
            }
        }
        Action::RestoreAll => {
            next.hidden.clear();
            next.hidden_children_by_parent.clear();
            next.pin_roots.clear();
            next.pinned.clear();
        }
        Action::PinNode(id) => {
            next.pinned.extend(model.descendant_ids(&id));
            next.pin_roots.insert(id);
        }
        Action::UnpinNode(id) => {
            // Descendants covered by another pin root stay pinned.
            next.pin_roots.remove(&id);
            next.pinned = cover(&next.pin_roots, model);
        }
        Action::ToggleNodeSelection(id) => {
            model.get(&id);
            if !next.selected.remove(&id) {
                next.selected.insert(id);
            }
        }
        Action::EnterMultiselect => {
            next.multiselect = true;
        }
        Action::LeaveMultiselect => {
            next.multiselect = false;
            next.selected.clear();
        }
    }
    next
}

/// Everything below any of the given pin roots, the roots themselves included.
fn cover(pin_roots: &BTreeSet<String>, model: &GraphModel) -> BTreeSet<String> {
    pin_roots
        .iter()
        .flat_map(|root| model.descendant_ids(root))
        .collect()
}
