use colored::*;
use eyre::Result;
use std::path::Path;

use super::{load_composition, print_structured};
use crate::cli::OutputFormat;
use mixkit::config::Config;

pub fn run(manifest: &Path, type_name: &str, format: Option<OutputFormat>, config: &Config) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let registry = &composition.registry;
    let ty = composition.type_id(type_name)?;

    let ledger: Vec<&str> = registry.mixins(ty).iter().map(|m| registry.name_of(*m)).collect();

    if print_structured(OutputFormat::resolve(format), &ledger)? {
        return Ok(());
    }

    println!("{} {}", "Mixin ledger of".bold(), type_name.cyan());
    println!();
    if ledger.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (index, name) in ledger.iter().enumerate() {
        println!("  {} {}", format!("{}.", index + 1).dimmed(), name.green());
    }

    Ok(())
}
