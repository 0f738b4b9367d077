//! Layered own behavior table
//!
//! Every member name keeps one slot per [`Layer`]. Writes replace the slot of
//! their own layer; reads return the slot of the highest layer present, so
//! `Own > Mixin > Augmented` no matter in which order the writes happened.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::TypeId;
use crate::value::Value;

/// Precedence layer of a member, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Augmented,
    Mixin,
    Own,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Where a member in the table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Given when the type was defined
    Declared,
    /// Passed as an override to `extend` or `derive`
    Override,
    /// Copied by `augment` from a plain bundle
    Bundle,
    /// Copied by `augment` from another type
    Trait(TypeId),
    /// Copied by `mixin` from a ledger entry
    Mixin(TypeId),
}

impl Origin {
    pub fn layer(&self) -> Layer {
        match self {
            Origin::Declared | Origin::Override => Layer::Own,
            Origin::Mixin(_) => Layer::Mixin,
            Origin::Bundle | Origin::Trait(_) => Layer::Augmented,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    origin: Origin,
}

#[derive(Debug, Clone, Default)]
pub struct BehaviorTable {
    members: IndexMap<String, BTreeMap<Layer, Slot>>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` in the layer of `origin`, replacing that layer's slot
    pub fn write(&mut self, name: impl Into<String>, value: Value, origin: Origin) {
        self.members
            .entry(name.into())
            .or_default()
            .insert(origin.layer(), Slot { value, origin });
    }

    /// Effective value of `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entry(name).map(|(value, _)| value)
    }

    /// Effective value of `name` together with its origin
    pub fn entry(&self, name: &str) -> Option<(&Value, Origin)> {
        let layers = self.members.get(name)?;
        let (_, slot) = layers.iter().next_back()?;
        Some((&slot.value, slot.origin))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// All layers holding `name`, highest precedence first
    pub fn layers(&self, name: &str) -> Vec<Origin> {
        self.members
            .get(name)
            .map(|layers| layers.values().rev().map(|slot| slot.origin).collect())
            .unwrap_or_default()
    }

    /// Effective members in first-write order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value, Origin)> {
        self.members.iter().filter_map(|(name, layers)| {
            layers
                .values()
                .next_back()
                .map(|slot| (name.as_str(), &slot.value, slot.origin))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
