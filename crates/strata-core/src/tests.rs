//! Unit tests for strata-core

use std::collections::BTreeMap;

use crate::model::*;
use crate::path::{contains_id, parent_id, NodePath};
use crate::registry::NodeRegistry;
use crate::report::*;
use crate::StructuralError;

fn declaration(id: &str) -> Declaration {
    Declaration {
        id: NodePath::from_dotted(id),
        kind: DeclarationKind::Class,
        language: Language::Java,
        physical_path: format!("src/{}.java", id.replace('.', "/")),
        imports: Vec::new(),
        used_types: Vec::new(),
        resolved: ResolvedDependencies::default(),
    }
}

#[test]
fn test_path_parent_and_simple_name() {
    let path = NodePath::from_dotted("app.domain.Model");
    assert_eq!(path.simple_name(), "Model");
    assert_eq!(path.parent().unwrap().dotted(), "app.domain");
    assert_eq!(path.namespace(), ["app", "domain"]);

    let root = NodePath::from_dotted("app");
    assert!(root.parent().is_none());
}

#[test]
fn test_path_segments_never_contain_dots() {
    let path = NodePath::new(["pkg", "file.ts"]);
    assert_eq!(path.dotted(), "pkg.file_ts");
    assert_eq!(path.len(), 2);
}

#[test]
fn test_path_containment_is_segment_aware() {
    let ancestor = NodePath::from_dotted("a.b");
    assert!(ancestor.contains(&NodePath::from_dotted("a.b.c")));
    assert!(ancestor.contains(&NodePath::from_dotted("a.b")));
    assert!(!ancestor.contains(&NodePath::from_dotted("a.c.b")));

    assert!(contains_id("a.b", "a.b.c"));
    assert!(contains_id("a.b", "a.b"));
    assert!(!contains_id("a.b", "a.bc"));
    assert_eq!(parent_id("a.b.c"), Some("a.b"));
    assert_eq!(parent_id("a"), None);
}

#[test]
fn test_registry_indexes_by_id_and_simple_name() {
    let registry = NodeRegistry::from_declarations([
        declaration("app.domain.Model"),
        declaration("app.api.Model"),
        declaration("app.api.Controller"),
    ]);

    assert_eq!(registry.len(), 3);
    assert!(registry.contains(&NodePath::from_dotted("app.domain.Model")));
    assert_eq!(registry.ids_with_simple_name("Model").len(), 2);
    assert_eq!(registry.ids_with_simple_name("Controller").len(), 1);
    assert!(registry.ids_with_simple_name("Missing").is_empty());
}

#[test]
fn test_type_ref_flattening_recurses_through_generics() {
    let type_ref = TypeRef::generic(
        "Map",
        vec![
            TypeRef::simple("String"),
            TypeRef::generic("List", vec![TypeRef::simple("Model")]),
        ],
    );
    let names: Vec<&str> = type_ref.flattened().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Map", "String", "List", "Model"]);
}

#[test]
fn test_declaration_parses_input_contract_json() {
    let json = r#"{
        "id": "app.domain.Model",
        "kind": "class",
        "language": "java",
        "physicalPath": "src/app/domain/Model.java",
        "dependencies": [
            {"path": "app.api.Controller", "isWildcard": false, "isDotImport": false},
            {"path": "lib.collections", "isWildcard": true}
        ],
        "usedTypes": [
            {"name": "Controller", "usageKind": "inheritance"},
            {"name": "List", "genericArgs": [{"name": "Entry"}]}
        ]
    }"#;

    let declaration: Declaration = serde_json::from_str(json).unwrap();
    assert_eq!(declaration.name(), "Model");
    assert_eq!(declaration.imports.len(), 2);
    assert!(declaration.imports[1].is_wildcard);
    assert_eq!(declaration.used_types[0].usage_kind, UsageKind::Inheritance);
    assert_eq!(declaration.used_types[1].generic_args.len(), 1);
    assert!(declaration.used_types[0].resolved_path.is_none());
}

#[test]
fn test_no_common_ancestor_error_names_both_endpoints() {
    use std::error::Error;
    let err = StructuralError::NoCommonAncestor {
        source_id: "app.a.X".to_string(),
        target_id: "app.b.Y".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "nodes `app.a.X` and `app.b.Y` share no common ancestor"
    );
    // The endpoint ids are plain data, not a wrapped cause.
    assert!(err.source().is_none());
}

fn edge(is_cyclic: bool, weight: u32) -> EdgeInfo {
    EdgeInfo {
        is_cyclic,
        weight,
        usage_type: "usage".to_string(),
    }
}

fn sample_report() -> ProjectReport {
    let leaf = |id: &str| {
        (
            id.to_string(),
            LeafInfo {
                id: id.to_string(),
                name: id.rsplit('.').next().unwrap().to_string(),
                physical_path: format!("{}.java", id.replace('.', "/")),
                node_type: "class".to_string(),
                language: "java".to_string(),
                dependencies: BTreeMap::new(),
            },
        )
    };
    ProjectReport {
        project_tree_roots: vec![ProjectTreeNode {
            leaf_id: None,
            name: "app".to_string(),
            level: 1,
            contained_leaves: vec!["app.A".to_string(), "app.B".to_string()],
            contained_internal_dependencies: BTreeMap::from([("lib.C".to_string(), edge(false, 2))]),
            children: vec![
                ProjectTreeNode {
                    leaf_id: Some("app.A".to_string()),
                    name: "A".to_string(),
                    level: 0,
                    contained_leaves: vec!["app.A".to_string()],
                    contained_internal_dependencies: BTreeMap::new(),
                    children: Vec::new(),
                },
                ProjectTreeNode {
                    leaf_id: Some("app.B".to_string()),
                    name: "B".to_string(),
                    level: 0,
                    contained_leaves: vec!["app.B".to_string()],
                    contained_internal_dependencies: BTreeMap::new(),
                    children: Vec::new(),
                },
            ],
        }],
        leaves: BTreeMap::from([leaf("app.A"), leaf("app.B")]),
    }
}

#[test]
fn test_report_round_trips_through_json() {
    let report = sample_report();
    let json = report.to_json().unwrap();
    let reloaded = ProjectReport::from_json(&json).unwrap();
    assert_eq!(report, reloaded);
}

#[test]
fn test_report_json_uses_camel_case_field_names() {
    let json = sample_report().to_json().unwrap();
    assert!(json.contains("projectTreeRoots"));
    assert!(json.contains("containedInternalDependencies"));
    assert!(json.contains("containedLeaves"));
    assert!(json.contains("isCyclic"));
    assert!(json.contains("leafId"));
    // The usage label of an edge goes out under the bare key `type`.
    assert!(json.contains("\"type\": \"usage\""));
    assert!(!json.contains("usageType"));
}

#[test]
fn test_report_validation_rejects_missing_leaf() {
    let mut report = sample_report();
    report.leaves.remove("app.B");
    let json = serde_json::to_string(&report).unwrap();
    match ProjectReport::from_json(&json) {
        Err(StructuralError::MissingLeaf(id)) => assert_eq!(id, "app.B"),
        other => panic!("expected MissingLeaf, got {other:?}"),
    }
}

#[test]
fn test_report_validation_rejects_duplicate_sibling_names() {
    let mut report = sample_report();
    report.project_tree_roots[0].children[1].name = "A".to_string();
    let json = serde_json::to_string(&report).unwrap();
    assert!(matches!(
        ProjectReport::from_json(&json),
        Err(StructuralError::DuplicateChild { .. })
    ));
}

#[test]
fn test_report_counts_containers_and_leaves() {
    assert_eq!(sample_report().node_count(), 3);
}
