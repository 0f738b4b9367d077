use colored::*;
use eyre::Result;
use std::path::{Path, PathBuf};

use super::{load_composition, load_document, print_structured};
use crate::cli::OutputFormat;
use mixkit::config::Config;
use mixkit::value::{Map, Value};

pub fn run(
    manifest: &Path,
    type_name: &str,
    with: Option<&PathBuf>,
    format: Option<OutputFormat>,
    config: &Config,
) -> Result<()> {
    let composition = load_composition(manifest, config)?;
    let registry = &composition.registry;
    let ty = composition.type_id(type_name)?;

    let overrides = match with {
        Some(path) => load_document(&Config::expand_path(path))?,
        None => Map::new(),
    };
    let attrs = Value::from(registry.configure(ty, &overrides)).to_json();

    if print_structured(OutputFormat::resolve(format), &attrs)? {
        return Ok(());
    }

    println!("{} {}", "Attributes of".bold(), type_name.cyan());
    println!();
    print!("{}", serde_yaml::to_string(&attrs)?);

    Ok(())
}
