use colored::*;
use eyre::Result;
use serde::Serialize;
use std::path::Path;

use super::{describe_origin, load_composition, print_structured};
use crate::cli::OutputFormat;
use mixkit::config::Config;
use mixkit::registry::{Resolution, TypeRegistry};

#[derive(Serialize)]
struct MemberRow {
    name: String,
    kind: &'static str,
    value: serde_json::Value,
    owner: String,
    layer: String,
    origin: String,
}

impl MemberRow {
    fn new(registry: &TypeRegistry, name: &str, resolution: &Resolution) -> Self {
        Self {
            name: name.to_string(),
            kind: resolution.value.kind(),
            value: resolution.value.to_json(),
            owner: registry.name_of(resolution.owner).to_string(),
            layer: resolution.origin.layer().to_string(),
            origin: describe_origin(registry, resolution.origin),
        }
    }
}

pub fn run(
    manifest: &Path,
    type_name: &str,
    member: Option<&str>,
    format: Option<OutputFormat>,
    config: &Config,
) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let registry = &composition.registry;
    let ty = composition.type_id(type_name)?;

    let rows: Vec<MemberRow> = match member {
        Some(name) => {
            let resolution = registry
                .explain(ty, name)
                .ok_or_else(|| eyre::eyre!("No member '{}' on {}", name, type_name))?;
            vec![MemberRow::new(registry, name, &resolution)]
        }
        None => registry
            .resolved_entries(ty)
            .iter()
            .map(|(name, resolution)| MemberRow::new(registry, name, resolution))
            .collect(),
    };

    if print_structured(OutputFormat::resolve(format), &rows)? {
        return Ok(());
    }

    let lineage: Vec<&str> = registry.lineage(ty).into_iter().map(|t| registry.name_of(t)).collect();
    println!("{} {}", "Members of".bold(), lineage.join(" → ").cyan());
    println!();

    if rows.is_empty() {
        println!("  {}", "(none)".dimmed());
        return Ok(());
    }

    for row in &rows {
        println!(
            "  {:<20} {:<8} {} {}",
            row.name.green(),
            row.kind,
            format!("from {}", row.owner).cyan(),
            format!("({}, {})", row.layer, row.origin).dimmed()
        );
    }

    Ok(())
}
