//! Integration tests for Strata
//!
//! These tests drive the full path from extractor output through the batch
//! pipeline, the persisted report, and the interactive view.

use std::fs;

use strata_core::ProjectReport;
use strata_pipeline::{language_policy, ExternalDictionaries};
use strata_view::{
    layout, projected_edges, reduce, visible_nodes, Action, EdgeClass, EdgeFilter, GraphModel,
    ViewState,
};

/// A small Go-flavored project: an exposed handler reaching storage through a
/// private helper, plus a mutual cycle between two packages.
const DECLARATIONS: &str = r#"[
    {
        "id": "shop.api.Handler",
        "kind": "struct",
        "language": "go",
        "physicalPath": "shop/api/handler.go",
        "usedTypes": [
            {"name": "helper", "usageKind": "usage"},
            {"name": "Catalog", "usageKind": "usage"}
        ]
    },
    {
        "id": "shop.api.helper",
        "kind": "function",
        "language": "go",
        "physicalPath": "shop/api/helper.go",
        "usedTypes": [{"name": "Store", "usageKind": "usage"}]
    },
    {
        "id": "shop.storage.Store",
        "kind": "struct",
        "language": "go",
        "physicalPath": "shop/storage/store.go",
        "usedTypes": [{"name": "Catalog", "usageKind": "usage"}]
    },
    {
        "id": "shop.catalog.Catalog",
        "kind": "struct",
        "language": "go",
        "physicalPath": "shop/catalog/catalog.go",
        "usedTypes": [{"name": "Store", "usageKind": "instantiation"}]
    }
]"#;

fn build_report() -> ProjectReport {
    let declarations = strata_pipeline::parse_declarations(DECLARATIONS).unwrap();
    strata_pipeline::process(declarations, &ExternalDictionaries::builtin(), language_policy)
}

#[test]
fn test_pipeline_collapses_private_helpers_into_public_edges() {
    let report = build_report();

    // The lowercase helper is gone; its reach folded into the handler.
    assert!(!report.leaves.contains_key("shop.api.helper"));
    let handler = &report.leaves["shop.api.Handler"];
    assert!(handler.dependencies.contains_key("shop.storage.Store"));
    assert!(handler.dependencies.contains_key("shop.catalog.Catalog"));
}

#[test]
fn test_pipeline_tags_the_storage_catalog_cycle() {
    let report = build_report();

    assert!(report.leaves["shop.storage.Store"].dependencies["shop.catalog.Catalog"].is_cyclic);
    assert!(report.leaves["shop.catalog.Catalog"].dependencies["shop.storage.Store"].is_cyclic);
    assert!(!report.leaves["shop.api.Handler"].dependencies["shop.storage.Store"].is_cyclic);
}

#[test]
fn test_report_survives_a_disk_round_trip() {
    let report = build_report();
    report.validate().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.strata.json");
    fs::write(&path, report.to_json().unwrap()).unwrap();

    let reloaded = ProjectReport::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, report);
}

#[test]
fn test_report_json_uses_the_boundary_field_names() {
    let json = build_report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(value.get("projectTreeRoots").is_some());
    assert!(value.get("leaves").is_some());
    let root = &value["projectTreeRoots"][0];
    assert!(root.get("containedLeaves").is_some());
    assert!(root.get("containedInternalDependencies").is_some());
    assert!(root.get("level").is_some());
}

#[test]
fn test_view_projects_and_classifies_the_loaded_report() {
    let report = build_report();
    let model = GraphModel::from_report(&report);

    let mut state = ViewState::new();
    state = reduce(&state, &model, Action::ExpandNode("shop".to_string()));
    state = reduce(&state, &model, Action::ChangeFilter(EdgeFilter::All));

    let visible: Vec<&str> = visible_nodes(&model, &state)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert!(visible.contains(&"shop.api"));
    assert!(visible.contains(&"shop.storage"));
    assert!(visible.contains(&"shop.catalog"));

    let edges = projected_edges(&model, &state).unwrap();
    let storage_to_catalog = edges
        .iter()
        .find(|e| e.edge.source == "shop.storage" && e.edge.target == "shop.catalog")
        .expect("aggregated cycle edge visible");
    assert!(storage_to_catalog.edge.is_cyclic);
    assert!(matches!(
        storage_to_catalog.class,
        EdgeClass::Cyclic | EdgeClass::Feedback
    ));
}

#[test]
fn test_layout_covers_every_visible_node() {
    let report = build_report();
    let model = GraphModel::from_report(&report);

    let mut state = ViewState::new();
    for id in ["shop", "shop.api", "shop.storage", "shop.catalog"] {
        state = reduce(&state, &model, Action::ExpandNode(id.to_string()));
    }

    let result = layout(&model, &state);
    for node in visible_nodes(&model, &state) {
        assert!(result.positions.contains_key(&node.id), "{} placed", node.id);
        assert!(result.sizes.contains_key(&node.id), "{} sized", node.id);
    }

    // Expanded containers grow beyond the singular footprint.
    assert!(result.sizes["shop"].width > 100.0);
}
