//! Strata View: the interactive half. A flat graph model over a loaded
//! report, immutable view-state snapshots with an action reducer, visible-node
//! projection, edge classification and filtering, and compound layout.

pub mod edges;
pub mod layout;
pub mod model;
pub mod project;
pub mod state;


pub use edges::{classify, classify_and_filter, ClassifiedEdge, Edge, EdgeClass, EdgeFilter};
pub use layout::{layout, Layout, Position, Size};
pub use model::{GraphModel, GraphNode, ShallowEdge};
pub use project::{
    feedback_leaf_edges, projected_edges, visible_edges, visible_feedback_leaf_edges,
    visible_nodes,
};
pub use state::{reduce, Action, ViewState};
