//! Cross-referencing of used type names to declaration ids

use std::collections::HashMap;

use strata_core::{Declaration, Language, NodePath, NodeRegistry, TypeRef, UsageKind};

/// Well-known external simple names (standard library, framework types) mapped
/// to canonical ids. Targets in a dictionary are outside the registry and
/// therefore never produce internal edges; resolving them anyway keeps them
/// distinguishable from genuinely unknown names.
#[derive(Debug, Default)]
pub struct ExternalDictionary {
    by_simple_name: HashMap<String, NodePath>,
}

impl ExternalDictionary {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        ExternalDictionary {
            by_simple_name: entries
                .into_iter()
                .map(|(name, id)| (name.to_string(), NodePath::from_dotted(id)))
                .collect(),
        }
    }

    pub fn lookup(&self, simple_name: &str) -> Option<&NodePath> {
        self.by_simple_name.get(simple_name)
    }
}

/// One dictionary per source language.
#[derive(Debug, Default)]
pub struct ExternalDictionaries {
    by_language: HashMap<Language, ExternalDictionary>,
}

impl ExternalDictionaries {
    pub fn empty() -> Self {
        ExternalDictionaries::default()
    }

    /// A small stock of unmistakable standard-library names per language.
    pub fn builtin() -> Self {
        let mut dictionaries = ExternalDictionaries::default();
        dictionaries.insert(
            Language::Java,
            ExternalDictionary::new([
                ("String", "java.lang.String"),
                ("Integer", "java.lang.Integer"),
                ("List", "java.util.List"),
                ("Map", "java.util.Map"),
                ("Set", "java.util.Set"),
                ("Optional", "java.util.Optional"),
            ]),
        );
        dictionaries.insert(
            Language::TypeScript,
            ExternalDictionary::new([
                ("Promise", "lib.es.Promise"),
                ("Array", "lib.es.Array"),
                ("Record", "lib.es.Record"),
                ("Partial", "lib.es.Partial"),
            ]),
        );
        dictionaries.insert(
            Language::Python,
            ExternalDictionary::new([
                ("dataclass", "dataclasses.dataclass"),
                ("Enum", "enum.Enum"),
                ("Path", "pathlib.Path"),
            ]),
        );
        dictionaries
    }

    pub fn insert(&mut self, language: Language, dictionary: ExternalDictionary) {
        self.by_language.insert(language, dictionary);
    }

    fn lookup(&self, language: Language, simple_name: &str) -> Option<&NodePath> {
        self.by_language
            .get(&language)?
            .lookup(simple_name)
    }
}

/// Resolve every used type of every declaration and derive the per-declaration
/// internal/external dependency sets. Pure: returns fresh declarations; the
/// input registry is the read-only index.
pub fn resolve_all(registry: &NodeRegistry, dictionaries: &ExternalDictionaries) -> Vec<Declaration> {
    let mut resolved: Vec<Declaration> = registry
        .declarations()
        .map(|declaration| resolve_declaration(declaration, registry, dictionaries))
        .collect();
    resolved.sort_by(|a, b| a.id.cmp(&b.id));

    let unresolved = resolved
        .iter()
        .flat_map(|d| d.used_types.iter())
        .flat_map(|t| t.flattened())
        .filter(|t| t.resolved_path.is_none())
        .count();
    tracing::debug!(declarations = resolved.len(), unresolved, "type resolution finished");
    resolved
}

fn resolve_declaration(
    declaration: &Declaration,
    registry: &NodeRegistry,
    dictionaries: &ExternalDictionaries,
) -> Declaration {
    let mut result = declaration.clone();
    result.used_types = declaration
        .used_types
        .iter()
        .map(|type_ref| resolve_type(type_ref, declaration, registry, dictionaries))
        .collect();

    result.resolved = Default::default();
    for type_ref in result.used_types.iter().flat_map(TypeRef::flattened) {
        let Some(target) = &type_ref.resolved_path else {
            continue;
        };
        if *target == declaration.id {
            continue;
        }
        if registry.contains(target) {
            result.resolved.record_internal(target.clone(), type_ref.usage_kind);
        } else {
            result.resolved.external.insert(target.clone());
        }
    }
    result
}

/// Resolve one type reference; generic arguments recurse with the same rules.
fn resolve_type(
    type_ref: &TypeRef,
    declaration: &Declaration,
    registry: &NodeRegistry,
    dictionaries: &ExternalDictionaries,
) -> TypeRef {
    let simple_name = type_ref.name.rsplit('.').next().unwrap_or(&type_ref.name);
    TypeRef {
        name: simple_name.to_string(),
        usage_kind: type_ref.usage_kind,
        generic_args: type_ref
            .generic_args
            .iter()
            .map(|arg| resolve_type(arg, declaration, registry, dictionaries))
            .collect(),
        resolved_path: resolve_name(simple_name, declaration, registry, dictionaries),
    }
}

/// The resolution priority order. Stops at the first match; ambiguity at the
/// final step leaves the reference unresolved rather than guessing.
fn resolve_name(
    simple_name: &str,
    declaration: &Declaration,
    registry: &NodeRegistry,
    dictionaries: &ExternalDictionaries,
) -> Option<NodePath> {
    // Self-references never resolve; a declaration cannot depend on itself.
    let candidates: Vec<&NodePath> = registry
        .ids_with_simple_name(simple_name)
        .iter()
        .filter(|id| **id != declaration.id)
        .collect();

    // 1. A sibling in the same immediate namespace.
    if let Some(sibling) = candidates
        .iter()
        .find(|id| id.namespace() == declaration.id.namespace())
    {
        return Some((*sibling).clone());
    }

    // 2. An explicit import binding this simple name (alias-aware). The
    //    imported path may well be external; that still counts as resolved.
    if let Some(import) = declaration
        .imports
        .iter()
        .filter(|import| !import.is_wildcard && !import.is_dot_import)
        .find(|import| import.local_name() == simple_name)
    {
        if import.path != declaration.id {
            return Some(import.path.clone());
        }
    }

    // 3. Wildcard and dot imports: the imported namespace plus the simple name.
    for import in declaration
        .imports
        .iter()
        .filter(|import| import.is_wildcard || import.is_dot_import)
    {
        let combined = import.path.child(simple_name);
        if combined != declaration.id && registry.contains(&combined) {
            return Some(combined);
        }
    }

    // 4. A globally unique simple name. More than one candidate is ambiguous
    //    and stays unresolved rather than falling through to the dictionary.
    match candidates.len() {
        1 => Some(candidates[0].clone()),
        0 => dictionaries.lookup(declaration.language, simple_name).cloned(),
        _ => None,
    }
}
