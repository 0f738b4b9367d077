//! Mixin ledger (`mixin`)
//!
//! Each type keeps an append-only list of the types mixed into it. Mixing in
//! copies the source's resolved members into the target's mixin layer and
//! folds the source's attributes under the target's own.

use eyre::Result;

use super::table::Origin;
use super::{CompositionStep, TypeId, TypeRegistry};
use crate::merge::{MixMode, mix};

impl TypeRegistry {
    /// Append `sources` to the ledger of `target` and copy their members.
    ///
    /// Sources apply in ledger order, later ones winning. Mixed-in members
    /// override augmented ones and lose to `target`'s own members.
    pub fn mixin(&mut self, target: TypeId, sources: &[TypeId]) -> Result<TypeId> {
        self.descriptor(target)?;

        for &source in sources {
            self.descriptor(source)?;
            let members = self.resolved_members(source);
            let attrs = self.attrs(source);

            log::debug!(
                "mixin {} into {} ({} members)",
                self.name_of(source),
                self.name_of(target),
                members.len()
            );

            let descriptor = self.descriptor_mut(target)?;
            descriptor.mixins.push(source);
            for (name, value) in members {
                descriptor.table.write(name, value, Origin::Mixin(source));
            }
            mix(MixMode::Shallow, &mut descriptor.mixin_attrs, &[&attrs]);
            descriptor.steps.push(CompositionStep::Mixed { source });
        }

        Ok(target)
    }

    /// Mixin ledger of `ty` in insertion order
    pub fn mixins(&self, ty: TypeId) -> &[TypeId] {
        self.types.get(ty.index()).map(|t| t.mixins.as_slice()).unwrap_or(&[])
    }
}
