//! Per-entity access facade.

use std::sync::Arc;

use access_manager_sdk::{
    Ability, AbilityCall, AccessPlugin, Attributes, CheckOutcome, DispatchKind, EntityType,
    InstanceSet,
};
use access_security::RequestContext;

use crate::error::AccessError;
use crate::registry::AccessRegistry;

/// Result of [`AccessManager::appendable`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Appendable {
    pub allowed: bool,
    /// Defaults populated by the plugins for the new instance. Meaningful
    /// only when `allowed`.
    pub attributes: Attributes,
}

/// Access checks for one entity type.
///
/// Cheap to construct; build one per request or per entity as convenient.
/// Model-level checks go to the resolved plugin, then the default plugin,
/// and are allowed when neither handles the ability. Abilities nobody
/// implements are open to everyone.
pub struct AccessManager<S: InstanceSet> {
    registry: Arc<AccessRegistry<S>>,
    queryset: S,
}

impl<S: InstanceSet> Clone for AccessManager<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            queryset: self.queryset.clone(),
        }
    }
}

impl<S: InstanceSet> AccessManager<S> {
    /// `queryset` is any set of the entity; the manager always starts from
    /// its [`all`](InstanceSet::all).
    #[must_use]
    pub fn new(registry: Arc<AccessRegistry<S>>, queryset: S) -> Self {
        Self { registry, queryset }
    }

    #[must_use]
    pub fn entity(&self) -> &EntityType {
        self.queryset.entity()
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<AccessRegistry<S>> {
        &self.registry
    }

    /// All instances of the entity.
    #[must_use]
    pub fn get_queryset(&self) -> S {
        self.queryset.all()
    }

    fn plugin_for(
        &self,
        entity: &EntityType,
        handles: impl Fn(&dyn AccessPlugin<S>) -> bool,
    ) -> Option<Arc<dyn AccessPlugin<S>>> {
        if let Some(plugin) = self.registry.resolve(entity)
            && handles(plugin.as_ref())
        {
            return Some(plugin);
        }
        let default = self.registry.default_plugin();
        handles(default.as_ref()).then_some(default)
    }

    /// Model-level check for `ability` on the managed entity.
    ///
    /// Plugins may populate `attributes`; read them after the call.
    #[tracing::instrument(skip_all, fields(entity = %self.entity(), ability = %ability))]
    pub fn verify_able(
        &self,
        ability: &Ability,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        let entity = self.entity();
        match self.plugin_for(entity, |p| p.verifies(ability)) {
            Some(plugin) => {
                let allowed = plugin.verify_able(ability, entity, ctx, attributes);
                tracing::debug!(plugin = plugin.name(), allowed, "Verify ability");
                allowed
            }
            None => {
                tracing::debug!("Verify ability not implemented, allowing");
                true
            }
        }
    }

    /// Narrow `set` for `ability`. The plugin is resolved from the set's own
    /// entity.
    #[tracing::instrument(skip_all, fields(entity = %set.entity(), ability = %ability))]
    pub fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        match self.plugin_for(set.entity(), |p| p.applies(ability)) {
            Some(plugin) => {
                tracing::debug!(plugin = plugin.name(), "Apply ability");
                plugin.apply_able(ability, set, ctx)
            }
            None => {
                tracing::debug!("Apply ability not implemented, returning input");
                set
            }
        }
    }

    /// [`verify_able`](Self::verify_able) from a `verify_<ability>` name.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Dispatch`] if `name` is not a valid `verify_` name
    pub fn verify_call(
        &self,
        name: &str,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> Result<bool, AccessError> {
        let ability = parse_call(name, DispatchKind::Verify)?;
        Ok(self.verify_able(&ability, ctx, attributes))
    }

    /// [`apply_able`](Self::apply_able) from an `apply_<ability>` name.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Dispatch`] if `name` is not a valid `apply_` name
    pub fn apply_call(&self, name: &str, set: S, ctx: &RequestContext) -> Result<S, AccessError> {
        let ability = parse_call(name, DispatchKind::Apply)?;
        Ok(self.apply_able(&ability, set, ctx))
    }

    /// Verify, then apply on the full set. Denial yields the empty set.
    #[must_use]
    pub fn able(&self, ability: &Ability, ctx: &RequestContext) -> S {
        let mut attributes = Attributes::new();
        if self.verify_able(ability, ctx, &mut attributes) {
            self.apply_able(ability, self.get_queryset(), ctx)
        } else {
            self.get_queryset().none()
        }
    }

    #[must_use]
    pub fn visible(&self, ctx: &RequestContext) -> S {
        self.able(&Ability::VISIBLE, ctx)
    }

    #[must_use]
    pub fn changeable(&self, ctx: &RequestContext) -> S {
        self.able(&Ability::CHANGEABLE, ctx)
    }

    #[must_use]
    pub fn deleteable(&self, ctx: &RequestContext) -> S {
        self.able(&Ability::DELETEABLE, ctx)
    }

    /// Model-level check for creating an instance, with the defaults the
    /// plugins populate.
    #[must_use]
    pub fn appendable(&self, ctx: &RequestContext) -> Appendable {
        let mut attributes = Attributes::new();
        let allowed = self.appendable_with(ctx, &mut attributes);
        Appendable {
            allowed,
            attributes,
        }
    }

    /// Like [`appendable`](Self::appendable), populating the caller's map.
    pub fn appendable_with(&self, ctx: &RequestContext, attributes: &mut Attributes) -> bool {
        self.verify_able(&Ability::APPENDABLE, ctx, attributes)
    }

    /// Legacy `check_<ability>` answer: `Deny`, or the populated defaults.
    #[deprecated(note = "use `verify_able` and read the attributes after the call")]
    #[must_use]
    pub fn check_able(&self, ability: &Ability, ctx: &RequestContext) -> CheckOutcome {
        tracing::warn!(
            entity = %self.entity(),
            ability = %ability,
            "check_{ability} is deprecated, use verify_{ability}"
        );
        let mut attributes = Attributes::new();
        if self.verify_able(ability, ctx, &mut attributes) {
            CheckOutcome::Defaults(attributes)
        } else {
            CheckOutcome::Deny
        }
    }
}

fn parse_call(name: &str, expected: DispatchKind) -> Result<Ability, AccessError> {
    let call = AbilityCall::parse(name).map_err(|source| AccessError::Dispatch {
        name: name.to_owned(),
        source,
    })?;
    if call.kind != expected {
        return Err(AccessError::WrongDispatch {
            name: name.to_owned(),
            expected: expected.prefix(),
        });
    }
    Ok(call.ability)
}
