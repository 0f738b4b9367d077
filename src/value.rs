//! Dynamic member values
//!
//! Everything stored in a behavior table, an instance field, or a default
//! attribute map is a [`Value`]. Structural objects are owned trees, methods
//! and instances are shared handles compared by identity.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::instance::Instance;
use crate::registry::TypeRegistry;

/// Ordered member map used for objects, bundles and behavior tables
pub type Map = IndexMap<String, Value>;

/// Signature of a native behavior: receiver first, then call arguments
pub type NativeFn = dyn Fn(&TypeRegistry, &Instance, &[Value]) -> eyre::Result<Value>;

/// A named callable behavior
#[derive(Clone)]
pub struct Method {
    name: Rc<str>,
    body: Rc<NativeFn>,
}

impl Method {
    pub fn new<F>(name: impl AsRef<str>, body: F) -> Self
    where
        F: Fn(&TypeRegistry, &Instance, &[Value]) -> eyre::Result<Value> + 'static,
    {
        Self {
            name: Rc::from(name.as_ref()),
            body: Rc::new(body),
        }
    }

    /// A behavior that ignores its receiver and returns a fixed value
    pub fn constant(name: impl AsRef<str>, value: Value) -> Self {
        Self::new(name, move |_, _, _| Ok(value.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, registry: &TypeRegistry, receiver: &Instance, args: &[Value]) -> eyre::Result<Value> {
        (self.body)(registry, receiver, args)
    }

    /// True when both handles point at the same implementation
    pub fn same_as(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.name)
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    /// Plain structural object, merged recursively in deep mode
    Object(Map),
    Method(Method),
    /// Constructed object with a type identity, never merged into
    Instance(Instance),
}

impl Value {
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Plain objects are the only values deep mix descends into
    pub fn is_structural(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Method(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match self {
            Value::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// Follow a dotted path through nested objects
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(self, |current, key| current.as_object()?.get(key))
    }

    /// Short tag used in listings
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Method(_) => "method",
            Value::Instance(_) => "instance",
        }
    }

    /// Render as JSON. Methods and instances become descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => {
                serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
            Value::Method(m) => serde_json::Value::String(format!("<method {}>", m.name())),
            Value::Instance(i) => serde_json::Value::String(format!("<instance of {}>", i.type_id())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n.into())
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Method> for Value {
    fn from(method: Method) -> Self {
        Value::Method(method)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

/// Convert a JSON object into a [`Map`]; anything else yields an empty map
pub fn map_from_json(value: serde_json::Value) -> Map {
    match Value::from(value) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
