//! Trait flattening (`augment`)
//!
//! Copies the fully resolved member set of each source into the target's
//! augmented layer. No inheritance link is created.

use eyre::Result;

use super::table::Origin;
use super::{CompositionStep, TypeId, TypeRegistry};
use crate::value::Map;

/// Something whose members can be flattened into a type
#[derive(Debug, Clone, Copy)]
pub enum TraitSource<'a> {
    /// Plain member bundle, copied as is
    Bundle(&'a Map),
    /// Another type, copied with everything it inherits
    Type(TypeId),
}

impl<'a> From<&'a Map> for TraitSource<'a> {
    fn from(bundle: &'a Map) -> Self {
        TraitSource::Bundle(bundle)
    }
}

impl From<TypeId> for TraitSource<'_> {
    fn from(ty: TypeId) -> Self {
        TraitSource::Type(ty)
    }
}

impl TypeRegistry {
    /// Flatten `sources` into `target`, later sources winning on conflict.
    ///
    /// Augmented members sit below own and mixed-in members of `target`.
    /// Sources are applied one by one; an unknown source type stops the
    /// operation and leaves earlier sources applied.
    pub fn augment(&mut self, target: TypeId, sources: &[TraitSource<'_>]) -> Result<TypeId> {
        self.descriptor(target)?;

        for source in sources {
            let (members, origin) = match *source {
                TraitSource::Bundle(bundle) => (bundle.clone(), Origin::Bundle),
                TraitSource::Type(ty) => {
                    self.descriptor(ty)?;
                    (self.resolved_members(ty), Origin::Trait(ty))
                }
            };

            log::debug!(
                "augment {} with {} members from {}",
                self.name_of(target),
                members.len(),
                match origin {
                    Origin::Trait(ty) => self.name_of(ty).to_string(),
                    _ => "bundle".to_string(),
                }
            );

            let descriptor = self.descriptor_mut(target)?;
            for (name, value) in members {
                descriptor.table.write(name, value, origin);
            }
            descriptor.steps.push(CompositionStep::Augmented { source: origin });
        }

        Ok(target)
    }
}
