//! Plugin API trait for access plugins.

use std::sync::Arc;

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;

/// Model-level rule: `true` allows the operation and may populate attributes.
pub type VerifyFn = Arc<dyn Fn(&EntityType, &RequestContext, &mut Attributes) -> bool + Send + Sync>;

/// Instance-level rule: returns a subset of the given set.
pub type ApplyFn<S> = Arc<dyn Fn(S, &RequestContext) -> S + Send + Sync>;

/// Policy object answering the two sides of the ability protocol.
///
/// A plugin declares which abilities it handles with [`verifies`](Self::verifies)
/// and [`applies`](Self::applies). Callers only dispatch to a side the plugin
/// claims; the default method bodies are the permissive answer for a side the
/// plugin does not implement (allow / identity).
///
/// Plugins are built once at startup and shared across threads. They must not
/// keep per-call state.
pub trait AccessPlugin<S: InstanceSet>: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns `true` if this plugin has a model-level check for `ability`.
    fn verifies(&self, _ability: &Ability) -> bool {
        false
    }

    /// Returns `true` if this plugin narrows instance sets for `ability`.
    fn applies(&self, _ability: &Ability) -> bool {
        false
    }

    /// Model-level check. May insert or override entries in `attributes`;
    /// the mutations are meaningful only when the result is `true`.
    fn verify_able(
        &self,
        _ability: &Ability,
        _entity: &EntityType,
        _ctx: &RequestContext,
        _attributes: &mut Attributes,
    ) -> bool {
        true
    }

    /// Instance-level narrowing. Must return a subset of `set`.
    fn apply_able(&self, _ability: &Ability, set: S, _ctx: &RequestContext) -> S {
        set
    }
}

impl<S: InstanceSet, P: AccessPlugin<S> + ?Sized> AccessPlugin<S> for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn verifies(&self, ability: &Ability) -> bool {
        (**self).verifies(ability)
    }

    fn applies(&self, ability: &Ability) -> bool {
        (**self).applies(ability)
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        (**self).verify_able(ability, entity, ctx, attributes)
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        (**self).apply_able(ability, set, ctx)
    }
}
