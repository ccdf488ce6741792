//! Strata Core: declaration model, node registry, and the persisted report schema

pub mod error;
pub mod model;
pub mod path;
pub mod registry;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use error::StructuralError;
pub use model::{Declaration, DeclarationKind, Import, Language, ResolvedDependencies, TypeRef, UsageKind};
pub use path::NodePath;
pub use registry::NodeRegistry;
pub use report::{EdgeInfo, LeafInfo, ProjectReport, ProjectTreeNode};
