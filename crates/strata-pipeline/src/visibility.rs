//! Transitive collapsing of implementation-private declarations

use std::collections::{BTreeSet, HashMap, HashSet};

use strata_core::{Declaration, Language, NodePath, UsageKind};

/// Classifies a declaration as exposed (part of the public surface) or
/// internal. The rule differs per source language, so it is injected rather
/// than hardcoded here.
pub type ExposurePolicy = fn(&Declaration) -> bool;

/// Uppercase initial means exposed, the Go convention and a reasonable
/// default for languages where the extractor lowercases private helpers.
pub fn case_policy(declaration: &Declaration) -> bool {
    declaration
        .name()
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

/// Everything is exposed; collapsing becomes a no-op filter.
pub fn expose_all(_: &Declaration) -> bool {
    true
}

/// Stock policy per language.
pub fn policy_for(language: Language) -> ExposurePolicy {
    match language {
        Language::Go => case_policy,
        _ => expose_all,
    }
}

/// Remove internal declarations, folding whatever they reference into the
/// exposed declarations that transitively reach them.
///
/// Internal declarations are transparent: the traversal passes through them
/// without recording them. Exposed targets are recorded and not descended
/// into. A visited set per traversal root makes cycles terminate, including
/// cycles alternating between exposed and internal declarations.
pub fn collapse(declarations: Vec<Declaration>, is_exposed: ExposurePolicy) -> Vec<Declaration> {
    let exposure: HashMap<NodePath, bool> = declarations
        .iter()
        .map(|d| (d.id.clone(), is_exposed(d)))
        .collect();
    let targets_by_id: HashMap<NodePath, Vec<(NodePath, BTreeSet<UsageKind>)>> = declarations
        .iter()
        .map(|d| {
            let targets = d
                .resolved
                .internal
                .iter()
                .map(|(t, kinds)| (t.clone(), kinds.clone()))
                .collect();
            (d.id.clone(), targets)
        })
        .collect();

    let internal_count = exposure.values().filter(|exposed| !**exposed).count();
    tracing::debug!(
        total = declarations.len(),
        internal = internal_count,
        "collapsing internal declarations"
    );

    declarations
        .into_iter()
        .filter(|d| exposure[&d.id])
        .map(|mut declaration| {
            let mut folded = strata_core::ResolvedDependencies {
                internal: Default::default(),
                external: declaration.resolved.external.clone(),
            };
            let mut visited: HashSet<NodePath> = HashSet::new();
            visited.insert(declaration.id.clone());
            let mut stack: Vec<(NodePath, Option<BTreeSet<UsageKind>>)> = targets_by_id[&declaration.id]
                .iter()
                .map(|(t, kinds)| (t.clone(), Some(kinds.clone())))
                .collect();

            while let Some((target, direct_kinds)) = stack.pop() {
                if target == declaration.id {
                    continue;
                }
                match exposure.get(&target) {
                    // Internal: transparent, traverse its own references.
                    Some(false) => {
                        if visited.insert(target.clone()) {
                            if let Some(next) = targets_by_id.get(&target) {
                                stack.extend(next.iter().map(|(t, _)| (t.clone(), None)));
                            }
                        }
                    }
                    // Exposed: record and stop descending. Directly referenced
                    // targets keep their usage kinds; targets reached through
                    // an internal chain fold in as plain usage.
                    Some(true) | None => {
                        let kinds = direct_kinds
                            .unwrap_or_else(|| BTreeSet::from([UsageKind::Usage]));
                        for kind in kinds {
                            folded.record_internal(target.clone(), kind);
                        }
                    }
                }
            }

            declaration.resolved = folded;
            declaration
        })
        .collect()
}
