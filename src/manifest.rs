//! Composition manifest parsing (YAML)
//!
//! A manifest declares types in order. Each type may extend or derive from an
//! earlier type, flatten traits in with `augment`, and record mixins. Entries
//! under `behaviors` become methods that return `"<Type>.<behavior>"`, so a
//! call shows which implementation dispatch picked.

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ComposeConfig;
use crate::registry::{Overrides, TraitSource, TypeDef, TypeId, TypeRegistry};
use crate::value::{Map, Method, Value};

/// Manifest structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    /// Types in declaration order
    #[serde(default)]
    pub types: IndexMap<String, TypeSpec>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeSpec {
    /// Base type to link this type to
    pub extends: Option<String>,

    /// Base type to derive this type from (constructor delegates to it)
    pub derive: Option<String>,

    /// Method names implemented by this type
    pub behaviors: Vec<String>,

    /// Plain data members
    pub members: IndexMap<String, serde_json::Value>,

    /// Members written as overrides by `extends`/`derive`
    pub overrides: IndexMap<String, serde_json::Value>,

    pub statics: IndexMap<String, serde_json::Value>,

    /// Default attributes
    pub attrs: IndexMap<String, serde_json::Value>,

    /// Trait sources: a type name or an inline bundle
    pub augment: Vec<TraitRef>,

    /// Types to mix in, in order
    pub mixins: Vec<String>,
}

/// A trait source in a manifest
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TraitRef {
    Type(String),
    Bundle(IndexMap<String, serde_json::Value>),
}

/// Registry built from a manifest, plus the manifest's type names
#[derive(Debug)]
pub struct Composition {
    pub registry: TypeRegistry,
    names: IndexMap<String, TypeId>,
}

impl Composition {
    /// Look up a type declared in the manifest
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("Type '{}' is not declared in the manifest", name))
    }

    /// Declared type names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

fn to_map(entries: &IndexMap<String, serde_json::Value>) -> Map {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect()
}

fn behavior(type_name: &str, name: &str) -> Value {
    let label = format!("{}.{}", type_name, name);
    Value::from(Method::constant(name, Value::from(label)))
}

impl Manifest {
    /// Load a manifest from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read manifest: {}", path.as_ref().display()))?;
        Self::from_str(&content)
    }

    /// Parse a manifest from YAML string
    pub fn from_str(content: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content).context("Failed to parse manifest")?;
        Ok(manifest)
    }

    /// Build a registry containing every declared type
    pub fn build(&self, config: &ComposeConfig) -> Result<Composition> {
        let mut composition = Composition {
            registry: TypeRegistry::with_config(config),
            names: IndexMap::new(),
        };

        for (name, spec) in &self.types {
            let id = Self::build_type(&mut composition, name, spec)
                .with_context(|| format!("Failed to build type '{}'", name))?;
            composition.names.insert(name.clone(), id);
        }

        log::info!("Built {} types from manifest", composition.names.len());
        Ok(composition)
    }

    fn build_type(composition: &mut Composition, name: &str, spec: &TypeSpec) -> Result<TypeId> {
        let mut members = to_map(&spec.members);
        for b in &spec.behaviors {
            members.insert(b.clone(), behavior(name, b));
        }
        let overrides = to_map(&spec.overrides);

        let id = match (&spec.extends, &spec.derive) {
            (Some(_), Some(_)) => eyre::bail!("'extends' and 'derive' are mutually exclusive"),
            (None, Some(base)) => {
                let base = composition.type_id(base)?;
                members.extend(overrides);
                let overrides = Overrides {
                    members,
                    statics: to_map(&spec.statics),
                };
                let id = composition.registry.derive_as(name, base, overrides)?;
                composition.registry.set_attrs(id, to_map(&spec.attrs))?;
                id
            }
            (extends, None) => {
                let def = TypeDef::new()
                    .members(members)
                    .attrs(to_map(&spec.attrs))
                    .statics(to_map(&spec.statics));
                let id = composition.registry.define(name, def)?;
                match extends {
                    Some(base) => {
                        let base = composition.type_id(base)?;
                        composition.registry.extend(id, base, overrides)?;
                    }
                    None if !overrides.is_empty() => {
                        eyre::bail!("'overrides' needs 'extends' or 'derive'")
                    }
                    None => {}
                }
                id
            }
        };

        if !spec.augment.is_empty() {
            enum Resolved {
                Type(TypeId),
                Bundle(Map),
            }
            let resolved = spec
                .augment
                .iter()
                .map(|source| match source {
                    TraitRef::Type(type_name) => composition.type_id(type_name).map(Resolved::Type),
                    TraitRef::Bundle(entries) => Ok(Resolved::Bundle(to_map(entries))),
                })
                .collect::<Result<Vec<_>>>()?;
            let sources: Vec<TraitSource<'_>> = resolved
                .iter()
                .map(|source| match source {
                    Resolved::Type(ty) => TraitSource::Type(*ty),
                    Resolved::Bundle(bundle) => TraitSource::Bundle(bundle),
                })
                .collect();
            composition.registry.augment(id, &sources)?;
        }

        if !spec.mixins.is_empty() {
            let sources = spec
                .mixins
                .iter()
                .map(|m| composition.type_id(m))
                .collect::<Result<Vec<_>>>()?;
            composition.registry.mixin(id, &sources)?;
        }

        Ok(id)
    }
}
