//! Strata Pipeline: the batch stage turning extracted declarations into a
//! persisted project report: symbol resolution, transitive privacy collapsing,
//! cycle tagging, hierarchical aggregation.

pub mod aggregate;
pub mod cycles;
pub mod resolver;
pub mod visibility;


pub use aggregate::aggregate;
pub use cycles::{detect_cycles, CyclicEdges};
pub use resolver::{resolve_all, ExternalDictionaries, ExternalDictionary};
pub use visibility::{case_policy, collapse, expose_all, policy_for, ExposurePolicy};

use strata_core::{Declaration, NodeRegistry, ProjectReport, StructuralError};

/// Parse an extractor output document: a JSON array of declarations.
pub fn parse_declarations(json: &str) -> Result<Vec<Declaration>, StructuralError> {
    Ok(serde_json::from_str(json)?)
}

/// Exposure dispatch on each declaration's own language tag, for mixed-language
/// projects.
pub fn language_policy(declaration: &Declaration) -> bool {
    visibility::policy_for(declaration.language)(declaration)
}

/// Run the whole batch stage over a set of declarations.
pub fn process(
    declarations: Vec<Declaration>,
    dictionaries: &ExternalDictionaries,
    is_exposed: ExposurePolicy,
) -> ProjectReport {
    let registry = NodeRegistry::from_declarations(declarations);
    tracing::info!(declarations = registry.len(), "starting batch pipeline");
    let resolved = resolver::resolve_all(&registry, dictionaries);
    let exposed = visibility::collapse(resolved, is_exposed);
    let cyclic = cycles::detect_cycles(&exposed);
    aggregate::aggregate(&exposed, &cyclic)
}
