use colored::*;
use eyre::Result;
use serde::Serialize;
use std::path::Path;

use super::{load_composition, print_structured};
use crate::cli::OutputFormat;
use mixkit::config::Config;

#[derive(Serialize)]
struct TypeSummary {
    name: String,
    superclass: Option<String>,
    mixins: Vec<String>,
    own_members: usize,
    resolved_members: usize,
    anonymous: bool,
}

pub fn run(manifest: &Path, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let registry = &composition.registry;

    let summaries: Vec<TypeSummary> = registry
        .iter()
        .map(|t| TypeSummary {
            name: t.name().to_string(),
            superclass: t.superclass().map(|s| registry.name_of(s).to_string()),
            mixins: t.mixins().iter().map(|m| registry.name_of(*m).to_string()).collect(),
            own_members: t.table().len(),
            resolved_members: registry.resolved_members(t.id()).len(),
            anonymous: t.is_anonymous(),
        })
        .collect();

    if print_structured(OutputFormat::resolve(format), &summaries)? {
        return Ok(());
    }

    println!("{}", "Types:".bold());
    println!();
    if summaries.is_empty() {
        println!("  {}", "(none)".dimmed());
        return Ok(());
    }

    for summary in &summaries {
        let mut line = format!("  {}", summary.name.green());
        if let Some(parent) = &summary.superclass {
            line.push_str(&format!(" {} {}", "extends".dimmed(), parent.cyan()));
        }
        if !summary.mixins.is_empty() {
            line.push_str(&format!(" {} {}", "mixins".dimmed(), summary.mixins.join(", ").cyan()));
        }
        println!(
            "{} {}",
            line,
            format!("[{} own / {} total]", summary.own_members, summary.resolved_members).dimmed()
        );
    }

    Ok(())
}
