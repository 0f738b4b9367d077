//! Type registry and single-chain inheritance
//!
//! This module handles:
//! - Defining types with an own behavior table, default attributes and statics
//! - Linking a subtype to its base (`extend`) or synthesizing one (`derive`)
//! - Resolving members through the inheritance chain at lookup time
//! - Constructing instances and answering is-a questions
//!
//! Descriptors live in an arena owned by [`TypeRegistry`] and are addressed
//! by [`TypeId`]. The superclass link is a plain `TypeId`, so a child never
//! owns its parent.

use eyre::{Result, eyre};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub mod augment;
pub mod mixin;
pub mod table;

pub use augment::TraitSource;
pub use table::{BehaviorTable, Layer, Origin};

use crate::config::ComposeConfig;
use crate::instance::Instance;
use crate::merge::{MixMode, mix, mixed};
use crate::value::{Map, Value};

/// Handle to a type inside one [`TypeRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Initializer run by [`TypeRegistry::construct`]
pub type InitFn = dyn Fn(&TypeRegistry, &Instance, &[Value]) -> Result<()>;

#[derive(Clone, Default)]
pub enum Constructor {
    /// Leaves the instance without own fields
    #[default]
    Empty,
    Native(Rc<InitFn>),
    /// Runs the superclass constructor with the same arguments
    Delegate,
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constructor::Empty => write!(f, "Empty"),
            Constructor::Native(_) => write!(f, "Native"),
            Constructor::Delegate => write!(f, "Delegate"),
        }
    }
}

/// One entry of a type's composition log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionStep {
    Declared,
    Extended { base: TypeId },
    Derived { base: TypeId },
    Augmented { source: Origin },
    Mixed { source: TypeId },
}

/// Definition of a new type
#[derive(Debug, Clone, Default)]
pub struct TypeDef {
    members: Map,
    attrs: Map,
    statics: Map,
    constructor: Constructor,
}

impl TypeDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    pub fn members(mut self, members: Map) -> Self {
        self.members.extend(members);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn attrs(mut self, attrs: Map) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn static_member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(name.into(), value.into());
        self
    }

    pub fn statics(mut self, statics: Map) -> Self {
        self.statics.extend(statics);
        self
    }

    pub fn constructor<F>(mut self, init: F) -> Self
    where
        F: Fn(&TypeRegistry, &Instance, &[Value]) -> Result<()> + 'static,
    {
        self.constructor = Constructor::Native(Rc::new(init));
        self
    }
}

/// Members and statics written by `extend` and `derive`
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub members: Map,
    pub statics: Map,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    pub fn static_member(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(name.into(), value.into());
        self
    }
}

impl From<Map> for Overrides {
    fn from(members: Map) -> Self {
        Self {
            members,
            statics: Map::new(),
        }
    }
}

#[derive(Debug)]
pub struct TypeDescriptor {
    id: TypeId,
    name: String,
    anonymous: bool,
    table: BehaviorTable,
    superclass: Option<TypeId>,
    mixins: Vec<TypeId>,
    constructor: Constructor,
    attrs: Map,
    mixin_attrs: Map,
    statics: Map,
    steps: Vec<CompositionStep>,
}

impl TypeDescriptor {
    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for types synthesized by [`TypeRegistry::derive`]
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn table(&self) -> &BehaviorTable {
        &self.table
    }

    pub fn superclass(&self) -> Option<TypeId> {
        self.superclass
    }

    pub fn mixins(&self) -> &[TypeId] {
        &self.mixins
    }

    pub fn own_attrs(&self) -> &Map {
        &self.attrs
    }

    pub fn statics(&self) -> &Map {
        &self.statics
    }

    pub fn steps(&self) -> &[CompositionStep] {
        &self.steps
    }
}

/// Where a member lookup landed
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: Value,
    /// Type in the chain whose table supplied the member
    pub owner: TypeId,
    pub origin: Origin,
}

/// Owner of every type descriptor
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    names: HashMap<String, TypeId>,
    max_chain_depth: usize,
    derived: usize,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::with_config(&ComposeConfig::default())
    }

    pub fn with_config(config: &ComposeConfig) -> Self {
        Self {
            types: Vec::new(),
            names: HashMap::new(),
            max_chain_depth: config.max_chain_depth.max(1),
            derived: 0,
        }
    }

    /// Define a new root type
    pub fn define(&mut self, name: &str, def: TypeDef) -> Result<TypeId> {
        self.insert(name, def, false)
    }

    fn insert(&mut self, name: &str, def: TypeDef, anonymous: bool) -> Result<TypeId> {
        if let Some(existing) = self.names.get(name) {
            eyre::bail!("Type '{}' already defined as {}", name, existing);
        }

        let id = TypeId(self.types.len() as u32);
        let mut table = BehaviorTable::new();
        for (member, value) in def.members {
            table.write(member, value, Origin::Declared);
        }

        self.types.push(TypeDescriptor {
            id,
            name: name.to_string(),
            anonymous,
            table,
            superclass: None,
            mixins: Vec::new(),
            constructor: def.constructor,
            attrs: def.attrs,
            mixin_attrs: Map::new(),
            statics: def.statics,
            steps: vec![CompositionStep::Declared],
        });
        self.names.insert(name.to_string(), id);
        log::debug!("defined type {} ({})", name, id);
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn descriptor(&self, id: TypeId) -> Result<&TypeDescriptor> {
        self.types
            .get(id.index())
            .ok_or_else(|| eyre!("Unknown type {}", id))
    }

    pub(crate) fn descriptor_mut(&mut self, id: TypeId) -> Result<&mut TypeDescriptor> {
        self.types
            .get_mut(id.index())
            .ok_or_else(|| eyre!("Unknown type {}", id))
    }

    /// Display name of `id`, for messages
    pub fn name_of(&self, id: TypeId) -> &str {
        self.types.get(id.index()).map(|t| t.name.as_str()).unwrap_or("<unknown>")
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Descriptors in definition order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Link `sub` to `base` and write `overrides` into `sub`'s own layer.
    ///
    /// Existing own members of `sub` survive unless overridden. Fails when the
    /// link would create a cycle, exceed the configured chain depth, or replace
    /// a different existing superclass.
    pub fn extend(&mut self, sub: TypeId, base: TypeId, overrides: impl Into<Overrides>) -> Result<TypeId> {
        let overrides = overrides.into();
        self.descriptor(base)?;
        let current = self.descriptor(sub)?.superclass;

        match current {
            Some(existing) if existing != base => eyre::bail!(
                "{} already extends {}, cannot extend {}",
                self.name_of(sub),
                self.name_of(existing),
                self.name_of(base)
            ),
            Some(_) => {}
            None => {
                if sub == base || self.is_subtype(base, sub) {
                    eyre::bail!(
                        "Inheritance cycle: {} cannot extend {}",
                        self.name_of(sub),
                        self.name_of(base)
                    );
                }
                let depth = self.lineage(base).len() + 1 + self.height_below(sub);
                if depth > self.max_chain_depth {
                    eyre::bail!(
                        "Inheritance chain of {} would be {} deep, limit is {}",
                        self.name_of(sub),
                        depth,
                        self.max_chain_depth
                    );
                }
            }
        }

        let descriptor = self.descriptor_mut(sub)?;
        descriptor.superclass = Some(base);
        for (member, value) in overrides.members {
            descriptor.table.write(member, value, Origin::Override);
        }
        descriptor.statics.extend(overrides.statics);
        descriptor.steps.push(CompositionStep::Extended { base });

        log::debug!("{} extends {}", self.name_of(sub), self.name_of(base));
        Ok(sub)
    }

    /// Synthesize an anonymous subtype of `base` whose own table is `overrides`.
    ///
    /// Its constructor delegates to `base`. `base` itself is left untouched.
    pub fn derive(&mut self, base: TypeId, overrides: impl Into<Overrides>) -> Result<TypeId> {
        let base_name = self.descriptor(base)?.name.clone();
        let mut counter = self.derived;
        let mut name = format!("{}~{}", base_name, counter);
        while self.names.contains_key(&name) {
            counter += 1;
            name = format!("{}~{}", base_name, counter);
        }
        let id = self.derive_inner(&name, base, overrides.into(), true)?;
        self.derived = counter + 1;
        Ok(id)
    }

    /// [`derive`](Self::derive) with a caller-chosen name
    pub fn derive_as(&mut self, name: &str, base: TypeId, overrides: impl Into<Overrides>) -> Result<TypeId> {
        self.derive_inner(name, base, overrides.into(), false)
    }

    fn derive_inner(&mut self, name: &str, base: TypeId, overrides: Overrides, anonymous: bool) -> Result<TypeId> {
        self.descriptor(base)?;
        let depth = self.lineage(base).len() + 1;
        if depth > self.max_chain_depth {
            eyre::bail!(
                "Inheritance chain of {} would be {} deep, limit is {}",
                name,
                depth,
                self.max_chain_depth
            );
        }

        let def = TypeDef {
            statics: overrides.statics,
            constructor: Constructor::Delegate,
            ..TypeDef::default()
        };

        let id = self.insert(name, def, anonymous)?;
        let descriptor = self.descriptor_mut(id)?;
        descriptor.superclass = Some(base);
        for (member, value) in overrides.members {
            descriptor.table.write(member, value, Origin::Override);
        }
        descriptor.steps.push(CompositionStep::Derived { base });

        log::debug!("derived {} from {}", name, self.name_of(base));
        Ok(id)
    }

    pub fn superclass(&self, ty: TypeId) -> Option<TypeId> {
        self.types.get(ty.index()).and_then(|t| t.superclass)
    }

    /// `ty` followed by its ancestors, nearest first
    pub fn lineage(&self, ty: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = self.types.get(ty.index()).map(|t| t.id);
        while let Some(id) = current {
            if chain.len() > self.types.len() {
                log::warn!("lineage of {} does not terminate", self.name_of(ty));
                break;
            }
            chain.push(id);
            current = self.superclass(id);
        }
        chain
    }

    /// Ancestors of `ty`, nearest first
    pub fn ancestors(&self, ty: TypeId) -> Vec<TypeId> {
        self.lineage(ty).into_iter().skip(1).collect()
    }

    /// True when `ancestor` is `ty` or anywhere above it
    pub fn is_subtype(&self, ty: TypeId, ancestor: TypeId) -> bool {
        self.lineage(ty).contains(&ancestor)
    }

    /// Identity check along the inheritance chain.
    ///
    /// Types that were only augmented or mixed in do not count.
    pub fn is_instance(&self, instance: &Instance, ty: TypeId) -> bool {
        self.is_subtype(instance.type_id(), ty)
    }

    // longest distance from `ty` down to any type that already inherits from it
    fn height_below(&self, ty: TypeId) -> usize {
        self.types
            .iter()
            .filter_map(|t| self.lineage(t.id).iter().position(|id| *id == ty))
            .max()
            .unwrap_or(0)
    }

    /// Member `name` as seen by instances of `ty`
    pub fn resolve(&self, ty: TypeId, name: &str) -> Option<Value> {
        self.explain(ty, name).map(|r| r.value)
    }

    /// Like [`resolve`](Self::resolve), also reporting owner and origin
    pub fn explain(&self, ty: TypeId, name: &str) -> Option<Resolution> {
        let found = self.lineage(ty).into_iter().find_map(|owner| {
            self.types[owner.index()]
                .table
                .entry(name)
                .map(|(value, origin)| Resolution {
                    value: value.clone(),
                    owner,
                    origin,
                })
        });
        log::trace!(
            "resolve {}.{} -> {}",
            self.name_of(ty),
            name,
            found.as_ref().map(|r| self.name_of(r.owner)).unwrap_or("<none>")
        );
        found
    }

    /// Every member reachable on `ty`, own and inherited, nearest wins
    pub fn resolved_members(&self, ty: TypeId) -> Map {
        self.resolved_entries(ty)
            .into_iter()
            .map(|(name, resolution)| (name, resolution.value))
            .collect()
    }

    /// [`resolved_members`](Self::resolved_members) with owner and origin
    pub fn resolved_entries(&self, ty: TypeId) -> IndexMap<String, Resolution> {
        let mut entries = IndexMap::new();
        for owner in self.lineage(ty).into_iter().rev() {
            for (name, value, origin) in self.types[owner.index()].table.iter() {
                entries.insert(
                    name.to_string(),
                    Resolution {
                        value: value.clone(),
                        owner,
                        origin,
                    },
                );
            }
        }
        entries
    }

    /// Create an instance of `ty` and run its constructor
    pub fn construct(&self, ty: TypeId, args: &[Value]) -> Result<Instance> {
        self.descriptor(ty)?;
        let instance = Instance::new(ty);
        self.run_constructor(ty, &instance, args)?;
        Ok(instance)
    }

    fn run_constructor(&self, ty: TypeId, instance: &Instance, args: &[Value]) -> Result<()> {
        let mut current = Some(ty);
        while let Some(id) = current {
            match &self.descriptor(id)?.constructor {
                Constructor::Empty => return Ok(()),
                Constructor::Native(init) => return init(self, instance, args),
                Constructor::Delegate => current = self.superclass(id),
            }
        }
        Ok(())
    }

    /// Invoke the implementation of `name` that `owner` overrides.
    ///
    /// Lookup starts at `owner`'s superclass, the receiver stays `instance`.
    pub fn call_super(&self, owner: TypeId, instance: &Instance, name: &str, args: &[Value]) -> Result<Value> {
        let parent = self
            .superclass(owner)
            .ok_or_else(|| eyre!("{} has no superclass", self.name_of(owner)))?;
        match self.resolve(parent, name) {
            Some(Value::Method(method)) => method.invoke(self, instance, args),
            Some(other) => eyre::bail!(
                "Member '{}' above {} is a {}, not a method",
                name,
                self.name_of(owner),
                other.kind()
            ),
            None => eyre::bail!("No member '{}' above {}", name, self.name_of(owner)),
        }
    }

    /// Replace the own default attributes of `ty`
    pub fn set_attrs(&mut self, ty: TypeId, attrs: Map) -> Result<()> {
        self.descriptor_mut(ty)?.attrs = attrs;
        Ok(())
    }

    pub fn statics(&self, ty: TypeId) -> Option<&Map> {
        self.types.get(ty.index()).map(|t| &t.statics)
    }

    /// Attributes of `ty` alone: mixed-in attributes under its own
    pub fn attrs(&self, ty: TypeId) -> Map {
        match self.types.get(ty.index()) {
            Some(t) => mixed(MixMode::Shallow, &[&t.mixin_attrs, &t.attrs]),
            None => Map::new(),
        }
    }

    /// Default attributes of `ty`, deep-merged from the root of its chain down
    pub fn default_attrs(&self, ty: TypeId) -> Map {
        let mut defaults = Map::new();
        for id in self.lineage(ty).into_iter().rev() {
            let attrs = self.attrs(id);
            mix(MixMode::Deep, &mut defaults, &[&attrs]);
        }
        defaults
    }

    /// Caller configuration deep-merged over the defaults of `ty`
    pub fn configure(&self, ty: TypeId, config: &Map) -> Map {
        let mut merged = self.default_attrs(ty);
        mix(MixMode::Deep, &mut merged, &[config]);
        merged
    }

    /// Composition log of `ty`, oldest first
    pub fn composition(&self, ty: TypeId) -> &[CompositionStep] {
        self.types.get(ty.index()).map(|t| t.steps.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Method;

    fn marker(label: &str) -> Value {
        Value::from(Method::constant(label, Value::from(label)))
    }

    #[test]
    fn test_define_rejects_duplicate_names() {
        let mut registry = TypeRegistry::new();
        registry.define("Base", TypeDef::new()).unwrap();
        let err = registry.define("Base", TypeDef::new()).unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn test_extend_links_and_overrides() {
        let mut registry = TypeRegistry::new();
        let base = registry
            .define(
                "Base",
                TypeDef::new()
                    .member("method1", marker("base.method1"))
                    .constructor(|_, this, _| {
                        this.set("name", "base");
                        Ok(())
                    }),
            )
            .unwrap();
        let sub = registry
            .define(
                "Sub",
                TypeDef::new()
                    .member("method", marker("sub.method"))
                    .constructor(|_, this, _| {
                        this.set("name", "subclass");
                        Ok(())
                    }),
            )
            .unwrap();

        let returned = registry
            .extend(sub, base, Overrides::new().member("method2", marker("sub.method2")))
            .unwrap();
        assert_eq!(returned, sub);

        let obj = registry.construct(sub, &[]).unwrap();
        assert!(registry.is_instance(&obj, sub));
        assert!(registry.is_instance(&obj, base));
        assert!(obj.has(&registry, "method"));
        assert!(obj.has(&registry, "method1"));
        assert!(obj.has(&registry, "method2"));
        assert_eq!(obj.field("name"), Some(Value::from("subclass")));
        assert_eq!(registry.superclass(sub), Some(base));
    }

    #[test]
    fn test_extend_overrides_beat_inherited_and_declared() {
        let mut registry = TypeRegistry::new();
        let base = registry.define("Base", TypeDef::new().member("m", "base")).unwrap();
        let sub = registry.define("Sub", TypeDef::new().member("m", "sub")).unwrap();
        registry
            .extend(sub, base, Overrides::new().member("m", "override"))
            .unwrap();

        let resolution = registry.explain(sub, "m").unwrap();
        assert_eq!(resolution.value, Value::from("override"));
        assert_eq!(resolution.owner, sub);
        assert_eq!(resolution.origin, Origin::Override);
    }

    #[test]
    fn test_extend_rejects_cycles() {
        let mut registry = TypeRegistry::new();
        let a = registry.define("A", TypeDef::new()).unwrap();
        let b = registry.define("B", TypeDef::new()).unwrap();

        assert!(registry.extend(a, a, Map::new()).is_err());

        registry.extend(b, a, Map::new()).unwrap();
        let err = registry.extend(a, b, Map::new()).unwrap_err();
        assert!(err.to_string().contains("Inheritance cycle"));
        assert_eq!(registry.superclass(a), None);
    }

    #[test]
    fn test_extend_rejects_second_base() {
        let mut registry = TypeRegistry::new();
        let a = registry.define("A", TypeDef::new()).unwrap();
        let b = registry.define("B", TypeDef::new()).unwrap();
        let c = registry.define("C", TypeDef::new()).unwrap();

        registry.extend(c, a, Map::new()).unwrap();
        registry.extend(c, a, Overrides::new().member("again", true)).unwrap();
        assert!(registry.extend(c, b, Map::new()).is_err());
        assert_eq!(registry.superclass(c), Some(a));
        assert!(registry.resolve(c, "again").is_some());
    }

    #[test]
    fn test_chain_depth_limit() {
        let mut registry = TypeRegistry::with_config(&ComposeConfig { max_chain_depth: 3 });
        let root = registry.define("Root", TypeDef::new()).unwrap();
        let mid = registry.derive(root, Map::new()).unwrap();
        let leaf = registry.derive(mid, Map::new()).unwrap();

        let err = registry.derive(leaf, Map::new()).unwrap_err();
        assert!(err.to_string().contains("limit is 3"));

        let top = registry.define("Top", TypeDef::new()).unwrap();
        assert!(registry.extend(root, top, Map::new()).is_err());
    }

    #[test]
    fn test_derive_creates_anonymous_subtype() {
        let mut registry = TypeRegistry::new();
        let root = registry.define("Root", TypeDef::new().member("r", "root")).unwrap();
        let base = registry.define("Base", TypeDef::new()).unwrap();
        registry.extend(base, root, Map::new()).unwrap();

        let sub2 = registry
            .derive(base, Overrides::new().member("m3", marker("m3")))
            .unwrap();

        let descriptor = registry.descriptor(sub2).unwrap();
        assert!(descriptor.is_anonymous());
        assert_eq!(descriptor.table().len(), 1);
        assert!(registry.descriptor(base).unwrap().table().is_empty());

        let obj = registry.construct(sub2, &[]).unwrap();
        assert!(registry.is_instance(&obj, sub2));
        assert!(registry.is_instance(&obj, base));
        assert!(registry.is_instance(&obj, root));
        assert_eq!(obj.get(&registry, "r"), Some(Value::from("root")));
        assert_eq!(registry.ancestors(sub2), vec![base, root]);
    }

    #[test]
    fn test_derive_skips_taken_names() {
        let mut registry = TypeRegistry::new();
        let base = registry.define("Base", TypeDef::new()).unwrap();
        let squatter = registry.define("Base~0", TypeDef::new()).unwrap();

        let first = registry.derive(base, Map::new()).unwrap();
        let second = registry.derive(base, Map::new()).unwrap();

        assert_ne!(first, squatter);
        assert_eq!(registry.name_of(first), "Base~1");
        assert_eq!(registry.name_of(second), "Base~2");
        assert_eq!(registry.superclass(first), Some(base));
        assert_eq!(registry.superclass(squatter), None);
    }

    #[test]
    fn test_derive_delegates_constructor() {
        let mut registry = TypeRegistry::new();
        let base = registry
            .define(
                "Base",
                TypeDef::new().constructor(|_, this, args| {
                    this.set("arg", args.first().cloned().unwrap_or_default());
                    Ok(())
                }),
            )
            .unwrap();
        let first = registry.derive(base, Map::new()).unwrap();
        let second = registry.derive(first, Map::new()).unwrap();

        let obj = registry.construct(second, &[Value::from("hello")]).unwrap();
        assert_eq!(obj.field("arg"), Some(Value::from("hello")));
        assert_ne!(registry.name_of(first), registry.name_of(second));
    }

    #[test]
    fn test_call_super_uses_receiver() {
        let mut registry = TypeRegistry::new();
        let base = registry
            .define(
                "Base",
                TypeDef::new().member(
                    "describe",
                    Method::new("describe", |_, this, _| {
                        Ok(Value::from(format!("base:{}", this.field("id").unwrap_or_default())))
                    }),
                ),
            )
            .unwrap();
        let sub = registry.define("Sub", TypeDef::new()).unwrap();
        registry
            .extend(
                sub,
                base,
                Overrides::new().member(
                    "describe",
                    Method::new("describe", move |registry, this, args| {
                        let inner = registry.call_super(sub, this, "describe", args)?;
                        Ok(Value::from(format!("sub({})", inner)))
                    }),
                ),
            )
            .unwrap();

        let obj = registry.construct(sub, &[]).unwrap();
        obj.set("id", 7);
        assert_eq!(obj.call(&registry, "describe", &[]).unwrap(), Value::from("sub(base:7)"));
        assert!(registry.call_super(base, &obj, "describe", &[]).is_err());
    }

    #[test]
    fn test_statics_from_overrides() {
        let mut registry = TypeRegistry::new();
        let base = registry.define("Base", TypeDef::new()).unwrap();
        let sub = registry
            .define("Sub", TypeDef::new().static_member("kind", "sub"))
            .unwrap();
        registry
            .extend(sub, base, Overrides::new().static_member("version", 2))
            .unwrap();

        let statics = registry.statics(sub).unwrap();
        assert_eq!(statics.get("kind"), Some(&Value::from("sub")));
        assert_eq!(statics.get("version"), Some(&Value::from(2)));
        assert!(registry.statics(base).unwrap().is_empty());
    }

    #[test]
    fn test_default_attrs_deep_merge_down_the_chain() {
        let mut registry = TypeRegistry::new();
        let shape = registry
            .define(
                "Shape",
                TypeDef::new()
                    .attr("style", crate::value::map_from_json(serde_json::json!({"fill": "black", "stroke": "none"})))
                    .attr("z", 0),
            )
            .unwrap();
        let rect = registry
            .define(
                "Rect",
                TypeDef::new().attr("style", crate::value::map_from_json(serde_json::json!({"fill": "red"}))),
            )
            .unwrap();
        registry.extend(rect, shape, Map::new()).unwrap();

        let defaults = Value::from(registry.default_attrs(rect));
        assert_eq!(defaults.pointer("style.fill"), Some(&Value::from("red")));
        assert_eq!(defaults.pointer("style.stroke"), Some(&Value::from("none")));
        assert_eq!(defaults.pointer("z"), Some(&Value::from(0)));

        let config = crate::value::map_from_json(serde_json::json!({"style": {"stroke": "blue"}}));
        let configured = Value::from(registry.configure(rect, &config));
        assert_eq!(configured.pointer("style.fill"), Some(&Value::from("red")));
        assert_eq!(configured.pointer("style.stroke"), Some(&Value::from("blue")));
    }

    #[test]
    fn test_composition_log() {
        let mut registry = TypeRegistry::new();
        let base = registry.define("Base", TypeDef::new()).unwrap();
        let sub = registry.define("Sub", TypeDef::new()).unwrap();
        registry.extend(sub, base, Map::new()).unwrap();

        assert_eq!(
            registry.composition(sub),
            &[CompositionStep::Declared, CompositionStep::Extended { base }]
        );
    }

    #[test]
    fn test_unknown_type_errors() {
        let mut registry = TypeRegistry::new();
        let base = registry.define("Base", TypeDef::new()).unwrap();
        let bogus = TypeId(42);

        assert!(registry.descriptor(bogus).is_err());
        assert!(registry.extend(bogus, base, Map::new()).is_err());
        assert!(registry.construct(bogus, &[]).is_err());
        assert_eq!(registry.name_of(bogus), "<unknown>");
        assert!(registry.lineage(bogus).is_empty());
    }
}
