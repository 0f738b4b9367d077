//! CLI command implementations

use eyre::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;
use mixkit::config::Config;
use mixkit::manifest::{Composition, Manifest};
use mixkit::registry::{Origin, TypeRegistry};
use mixkit::value::{Map, Value};

pub mod attrs;
pub mod call;
pub mod completions;
pub mod config;
pub mod ledger;
pub mod merge;
pub mod resolve;
pub mod tree;
pub mod types;

/// Load a manifest argument and build its registry
pub fn load_composition(manifest: &Path, config: &Config) -> Result<Composition> {
    let path = config.manifest_path(manifest);
    log::info!("Loading manifest from {}", path.display());
    Manifest::load(&path)?
        .build(&config.compose)
        .with_context(|| format!("Failed to build manifest {}", path.display()))
}

/// Read a JSON or YAML document that must be a mapping
pub fn load_document(path: &Path) -> Result<Map> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    // YAML is a superset of JSON, one parser covers both
    let parsed: serde_json::Value =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    match Value::from(parsed) {
        Value::Object(map) => Ok(map),
        other => eyre::bail!("{} must contain a mapping, found {}", path.display(), other.kind()),
    }
}

/// Human-readable origin of a member
pub fn describe_origin(registry: &TypeRegistry, origin: Origin) -> String {
    match origin {
        Origin::Declared => "declared".to_string(),
        Origin::Override => "override".to_string(),
        Origin::Bundle => "trait bundle".to_string(),
        Origin::Trait(ty) => format!("trait {}", registry.name_of(ty)),
        Origin::Mixin(ty) => format!("mixin {}", registry.name_of(ty)),
    }
}

/// Print `value` as JSON or YAML; returns false for text output
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
        OutputFormat::Text => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_document_accepts_json_and_yaml() {
        let temp = tempdir().unwrap();
        let json_path = temp.path().join("a.json");
        let yaml_path = temp.path().join("b.yaml");
        fs::write(&json_path, r#"{"a": {"b": 1}}"#).unwrap();
        fs::write(&yaml_path, "a:\n  c: 2\n").unwrap();

        let a = load_document(&json_path).unwrap();
        let b = load_document(&yaml_path).unwrap();

        assert_eq!(Value::from(a).pointer("a.b"), Some(&Value::from(1)));
        assert_eq!(Value::from(b).pointer("a.c"), Some(&Value::from(2)));
    }

    #[test]
    fn test_load_document_rejects_non_mapping() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("list.yaml");
        fs::write(&path, "- 1\n- 2\n").unwrap();

        let err = load_document(&path).unwrap_err();
        assert!(err.to_string().contains("must contain a mapping"));
    }
}
