//! Behavior wrappers
//!
//! `wrap_behavior` hands out a stable callable bound to one instance and one
//! member name, and remembers it on the instance so other call sites can
//! fetch the same handle later with `get_wrap_behavior`.

use eyre::Result;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::instance::{Instance, InstanceState};
use crate::registry::TypeRegistry;
use crate::value::Value;

struct Binding {
    name: String,
    receiver: Weak<InstanceState>,
}

/// A callable bound to `(instance, member name)`.
///
/// Holds the instance weakly; the record on the instance keeps it alive.
#[derive(Clone)]
pub struct BoundBehavior(Rc<Binding>);

impl BoundBehavior {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The bound instance, if it is still alive
    pub fn receiver(&self) -> Option<Instance> {
        self.0.receiver.upgrade().map(Instance::from_state)
    }

    /// Invoke the receiver's current member with `args`
    pub fn call(&self, registry: &TypeRegistry, args: &[Value]) -> Result<Value> {
        let receiver = self
            .receiver()
            .ok_or_else(|| eyre::eyre!("Wrapped behavior '{}' outlived its instance", self.0.name))?;
        receiver.call(registry, &self.0.name, args)
    }

    pub fn same_as(&self, other: &BoundBehavior) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for BoundBehavior {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for BoundBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundBehavior({})", self.0.name)
    }
}

/// Create a wrapper for `instance.name` and record it as the active one.
///
/// A previous wrapper for the same pair is replaced, not chained.
pub fn wrap_behavior(instance: &Instance, name: &str) -> BoundBehavior {
    let wrapper = BoundBehavior(Rc::new(Binding {
        name: name.to_string(),
        receiver: instance.downgrade(),
    }));
    instance.record_wrapper(name, wrapper.clone());
    log::debug!("wrapped behavior '{}' on instance of {}", name, instance.type_id());
    wrapper
}

/// The most recent wrapper for `instance.name`, if any
pub fn get_wrap_behavior(instance: &Instance, name: &str) -> Option<BoundBehavior> {
    instance.wrapper(name)
}
