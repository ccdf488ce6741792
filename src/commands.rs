//! CLI command implementations

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use strata_core::ProjectReport;
use strata_pipeline::{expose_all, language_policy, ExternalDictionaries};

pub fn process(
    input: PathBuf,
    output: String,
    out_dir: PathBuf,
    force_expose_all: bool,
) -> anyhow::Result<()> {
    tracing::info!("Processing declarations from {}", input.display());

    let json = fs::read_to_string(&input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let declarations = strata_pipeline::parse_declarations(&json)
        .with_context(|| format!("cannot parse {}", input.display()))?;
    tracing::info!("Loaded {} declarations", declarations.len());

    let policy: strata_pipeline::ExposurePolicy = if force_expose_all {
        expose_all
    } else {
        language_policy
    };
    let report = strata_pipeline::process(declarations, &ExternalDictionaries::builtin(), policy);
    report.validate()?;

    let path = out_dir.join(format!("{output}.strata.json"));
    fs::write(&path, report.to_json()?)
        .with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!(
        "Wrote {} ({} leaves, {} tree nodes)",
        path.display(),
        report.leaves.len(),
        report.node_count()
    );
    Ok(())
}

pub fn validate(report: PathBuf) -> anyhow::Result<()> {
    tracing::info!("Validating {}", report.display());

    let json = fs::read_to_string(&report)
        .with_context(|| format!("cannot read {}", report.display()))?;
    let parsed = ProjectReport::from_json(&json)
        .with_context(|| format!("structural check failed for {}", report.display()))?;

    println!(
        "{}: {} roots, {} tree nodes, {} leaves",
        report.display(),
        parsed.project_tree_roots.len(),
        parsed.node_count(),
        parsed.leaves.len()
    );
    Ok(())
}
