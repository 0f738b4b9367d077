//! Runtime behavior composition
//!
//! Types are built at run time from member tables and combined three ways:
//! - `extend`/`derive`: single-chain inheritance with identity
//! - `augment`: flatten the resolved members of traits into a type
//! - `mixin`: record reusable bundles in an inspectable ledger
//!
//! `mix` merges structural values shallowly or deeply, and `wrap_behavior`
//! hands out stable callables bound to an instance member.

pub mod config;
pub mod instance;
pub mod manifest;
pub mod merge;
pub mod registry;
pub mod value;
pub mod wrap;

pub use instance::Instance;
pub use merge::{MixMode, OwnMembers, mix, mixed};
pub use registry::{Origin, Overrides, TraitSource, TypeDef, TypeId, TypeRegistry};
pub use value::{Map, Method, Value};
pub use wrap::{BoundBehavior, get_wrap_behavior, wrap_behavior};
