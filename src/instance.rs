//! Constructed objects
//!
//! An [`Instance`] is a shared handle to an object created by
//! [`TypeRegistry::construct`]. It carries its type identity, its own fields
//! and the behavior wrappers recorded on it.

use eyre::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::registry::{TypeId, TypeRegistry};
use crate::value::{Map, Value};
use crate::wrap::BoundBehavior;

pub(crate) struct InstanceState {
    type_id: TypeId,
    fields: RefCell<Map>,
    wrappers: RefCell<HashMap<String, BoundBehavior>>,
}

#[derive(Clone)]
pub struct Instance(Rc<InstanceState>);

impl Instance {
    pub(crate) fn new(type_id: TypeId) -> Self {
        Self(Rc::new(InstanceState {
            type_id,
            fields: RefCell::new(Map::new()),
            wrappers: RefCell::new(HashMap::new()),
        }))
    }

    pub(crate) fn from_state(state: Rc<InstanceState>) -> Self {
        Self(state)
    }

    pub(crate) fn downgrade(&self) -> Weak<InstanceState> {
        Rc::downgrade(&self.0)
    }

    /// The type this instance was constructed from
    pub fn type_id(&self) -> TypeId {
        self.0.type_id
    }

    /// Set an own field, shadowing any member of the same name on the type
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.fields.borrow_mut().insert(name.into(), value.into());
    }

    /// Read an own field only
    pub fn field(&self, name: &str) -> Option<Value> {
        self.0.fields.borrow().get(name).cloned()
    }

    /// Snapshot of the own fields
    pub fn fields(&self) -> Map {
        self.0.fields.borrow().clone()
    }

    /// Own field first, then the member the type chain resolves
    pub fn get(&self, registry: &TypeRegistry, name: &str) -> Option<Value> {
        self.field(name).or_else(|| registry.resolve(self.type_id(), name))
    }

    /// True when `name` is reachable on this instance
    pub fn has(&self, registry: &TypeRegistry, name: &str) -> bool {
        self.get(registry, name).is_some()
    }

    /// Invoke the member `name` with this instance as receiver
    pub fn call(&self, registry: &TypeRegistry, name: &str, args: &[Value]) -> Result<Value> {
        log::trace!("call {}.{} with {} args", registry.name_of(self.type_id()), name, args.len());
        match self.get(registry, name) {
            Some(Value::Method(method)) => method.invoke(registry, self, args),
            Some(other) => eyre::bail!(
                "Member '{}' on {} is a {}, not a method",
                name,
                registry.name_of(self.type_id()),
                other.kind()
            ),
            None => eyre::bail!("No member '{}' on {}", name, registry.name_of(self.type_id())),
        }
    }

    pub(crate) fn record_wrapper(&self, name: &str, wrapper: BoundBehavior) {
        self.0.wrappers.borrow_mut().insert(name.to_string(), wrapper);
    }

    pub(crate) fn wrapper(&self, name: &str) -> Option<BoundBehavior> {
        self.0.wrappers.borrow().get(name).cloned()
    }

    /// True when both handles refer to the same object
    pub fn same_as(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_id", &self.0.type_id)
            .field("fields", &self.0.fields.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeDef;
    use crate::value::Method;

    #[test]
    fn test_own_field_shadows_type_member() {
        let mut registry = TypeRegistry::new();
        let base = registry
            .define("Base", TypeDef::new().member("name", "from-type"))
            .unwrap();
        let obj = registry.construct(base, &[]).unwrap();

        assert_eq!(obj.get(&registry, "name"), Some(Value::from("from-type")));
        obj.set("name", "from-instance");
        assert_eq!(obj.get(&registry, "name"), Some(Value::from("from-instance")));
        assert_eq!(obj.field("missing"), None);
    }

    #[test]
    fn test_call_passes_receiver() {
        let mut registry = TypeRegistry::new();
        let counter = registry
            .define(
                "Counter",
                TypeDef::new().member(
                    "bump",
                    Method::new("bump", |_, this, _| {
                        let next = this.field("count").and_then(|v| v.as_i64()).unwrap_or(0) + 1;
                        this.set("count", next);
                        Ok(Value::from(next))
                    }),
                ),
            )
            .unwrap();
        let obj = registry.construct(counter, &[]).unwrap();

        obj.call(&registry, "bump", &[]).unwrap();
        let result = obj.call(&registry, "bump", &[]).unwrap();

        assert_eq!(result, Value::from(2));
    }

    #[test]
    fn test_call_missing_or_non_callable_member_fails() {
        let mut registry = TypeRegistry::new();
        let plain = registry.define("Plain", TypeDef::new().member("c", "c")).unwrap();
        let obj = registry.construct(plain, &[]).unwrap();

        let err = obj.call(&registry, "c", &[]).unwrap_err();
        assert!(err.to_string().contains("not a method"));

        let err = obj.call(&registry, "nope", &[]).unwrap_err();
        assert!(err.to_string().contains("No member 'nope'"));
    }

    #[test]
    fn test_clones_share_identity() {
        let mut registry = TypeRegistry::new();
        let ty = registry.define("T", TypeDef::new()).unwrap();
        let a = registry.construct(ty, &[]).unwrap();
        let b = a.clone();
        let c = registry.construct(ty, &[]).unwrap();

        b.set("x", 1);
        assert_eq!(a.field("x"), Some(Value::from(1)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
