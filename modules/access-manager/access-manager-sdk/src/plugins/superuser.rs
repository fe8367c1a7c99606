//! Superuser bypass decorator.

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;
use crate::plugin_api::AccessPlugin;

/// Grants full access to superusers without consulting the wrapped plugin.
///
/// For a superuser, verify is `true` and apply returns the input unfiltered
/// for every ability the inner plugin claims. Other subjects are delegated
/// unchanged.
#[derive(Clone, Debug, Default)]
pub struct SuperuserBypass<P> {
    inner: P,
}

impl<P> SuperuserBypass<P> {
    #[must_use]
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }

    #[must_use]
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<S: InstanceSet, P: AccessPlugin<S>> AccessPlugin<S> for SuperuserBypass<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn verifies(&self, ability: &Ability) -> bool {
        self.inner.verifies(ability)
    }

    fn applies(&self, ability: &Ability) -> bool {
        self.inner.applies(ability)
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        if ctx.is_superuser() {
            return true;
        }
        self.inner.verify_able(ability, entity, ctx, attributes)
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        if ctx.is_superuser() {
            return set.all();
        }
        self.inner.apply_able(ability, set, ctx)
    }
}
