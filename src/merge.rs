//! Structural merge (`mix`)
//!
//! Copies own members of each source onto a target map, left to right.
//! In deep mode nested plain objects are merged key by key instead of being
//! replaced; arrays, primitives, methods and instances are always replaced.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::instance::Instance;
use crate::value::{Map, Value};

/// Merge strategy for [`mix`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// Top-level keys replace whole values
    Shallow,
    /// Nested plain objects are merged recursively
    #[default]
    Deep,
}

impl MixMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::Shallow => "shallow",
            MixMode::Deep => "deep",
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MixMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shallow" => Ok(MixMode::Shallow),
            "deep" => Ok(MixMode::Deep),
            _ => Err(format!("Unknown mix mode: {}", s)),
        }
    }
}

/// Anything that can contribute its own members to a merge.
///
/// Only members defined directly on the source are exposed; members an
/// instance reaches through its type are not.
pub trait OwnMembers {
    fn own_members(&self) -> Cow<'_, Map>;
}

impl OwnMembers for Map {
    fn own_members(&self) -> Cow<'_, Map> {
        Cow::Borrowed(self)
    }
}

impl OwnMembers for Instance {
    fn own_members(&self) -> Cow<'_, Map> {
        Cow::Owned(self.fields())
    }
}

/// Merge `sources` into `target` and return `target`.
///
/// Later sources win over earlier ones and over existing target members.
/// With no sources this is a no-op.
pub fn mix<'t>(mode: MixMode, target: &'t mut Map, sources: &[&dyn OwnMembers]) -> &'t mut Map {
    for source in sources {
        let members = source.own_members();
        merge_into(mode, target, &members);
    }
    target
}

/// [`mix`] into a fresh empty map
pub fn mixed(mode: MixMode, sources: &[&dyn OwnMembers]) -> Map {
    let mut target = Map::new();
    mix(mode, &mut target, sources);
    target
}

fn merge_into(mode: MixMode, target: &mut Map, source: &Map) {
    for (key, incoming) in source {
        if mode == MixMode::Deep {
            if let (Some(Value::Object(existing)), Value::Object(nested)) = (target.get_mut(key), incoming) {
                merge_into(mode, existing, nested);
                continue;
            }
        }
        target.insert(key.clone(), incoming.clone());
    }
}
