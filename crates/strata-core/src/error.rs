//! Error types shared across the pipeline and view crates

use thiserror::Error;

/// Violations of the batch/interactive boundary contract. These are fatal:
/// a persisted report that fails structural validation must not be loaded.
#[derive(Debug, Error)]
pub enum StructuralError {
    #[error("leaf `{0}` is referenced by the project tree but missing from the leaves table")]
    MissingLeaf(String),

    #[error("container `{parent}` has two children named `{name}`")]
    DuplicateChild { parent: String, name: String },

    // thiserror treats a field named `source` as the error's cause, so the
    // endpoint ids carry a suffix.
    #[error("nodes `{source_id}` and `{target_id}` share no common ancestor")]
    NoCommonAncestor { source_id: String, target_id: String },

    #[error("node `{child}` names parent `{parent}`, which is not part of the graph")]
    DanglingParent { child: String, parent: String },

    #[error("malformed project report: {0}")]
    Malformed(#[from] serde_json::Error),
}
