//! Permission-string checks answered by the access manager.
//!
//! Lets code that asks `has_perm("docs.change_doc")` go through the same
//! plugins as the facade.

use std::sync::Arc;

use access_manager_sdk::{Ability, Attributes, InstanceSet};
use access_security::{Filter, FilterValue, RequestContext, properties};

use crate::manager::AccessManager;
use crate::registry::AccessRegistry;

/// Looks up entities by app label and model name.
///
/// Each entity is represented by its full instance set.
pub trait EntityCatalog<S: InstanceSet>: Send + Sync {
    fn get_model(&self, app_label: &str, model_name: &str) -> Option<S>;

    fn get_models(&self, app_label: &str) -> Vec<S>;
}

/// Maps `app_label.<right>_<model>` permission strings to ability checks.
///
/// `add`, `change`, `delete` and `view` map to the well-known abilities; any
/// other right is used as the ability name.
pub struct PermissionBackend<S: InstanceSet> {
    registry: Arc<AccessRegistry<S>>,
    entities: Arc<dyn EntityCatalog<S>>,
}

impl<S: InstanceSet> PermissionBackend<S> {
    #[must_use]
    pub fn new(registry: Arc<AccessRegistry<S>>, entities: Arc<dyn EntityCatalog<S>>) -> Self {
        Self { registry, entities }
    }

    #[must_use]
    pub fn ability_for_right(right: &str) -> Ability {
        match right {
            "add" => Ability::APPENDABLE,
            "change" => Ability::CHANGEABLE,
            "delete" => Ability::DELETEABLE,
            "view" => Ability::VISIBLE,
            other => Ability::new(other),
        }
    }

    fn resolve(&self, perm: &str) -> Option<(AccessManager<S>, Ability)> {
        let Some((app_label, codename)) = perm.split_once('.') else {
            tracing::debug!(perm, "Malformed permission, expected app_label.codename");
            return None;
        };
        let Some((right, model_name)) = codename.split_once('_') else {
            tracing::debug!(perm, "Malformed permission codename, expected right_model");
            return None;
        };
        let Some(set) = self.entities.get_model(app_label, model_name) else {
            tracing::debug!(perm, app_label, model_name, "Unknown entity in permission");
            return None;
        };
        Some((
            AccessManager::new(Arc::clone(&self.registry), set),
            Self::ability_for_right(right),
        ))
    }

    /// Model-level check of `perm` for the subject.
    #[must_use]
    pub fn has_perm(&self, ctx: &RequestContext, perm: &str) -> bool {
        if !ctx.is_active() {
            return false;
        }
        self.resolve(perm).is_some_and(|(manager, ability)| {
            manager.verify_able(&ability, ctx, &mut Attributes::new())
        })
    }

    /// Instance-level check of `perm` on the instance with primary key `id`.
    ///
    /// Narrows the entity's full set to `id` with the ability's apply side;
    /// allowed iff the instance survives.
    #[must_use]
    pub fn has_object_perm(
        &self,
        ctx: &RequestContext,
        perm: &str,
        id: impl Into<FilterValue>,
    ) -> bool {
        if !ctx.is_active() {
            return false;
        }
        let Some((manager, ability)) = self.resolve(perm) else {
            return false;
        };
        let only = manager
            .get_queryset()
            .filter(Filter::eq(properties::RESOURCE_ID, id));
        !manager.apply_able(&ability, only, ctx).is_empty()
    }

    /// Returns `true` if any entity of `app_label` is visible to the subject.
    #[must_use]
    pub fn has_module_perms(&self, ctx: &RequestContext, app_label: &str) -> bool {
        if !ctx.is_active() {
            return false;
        }
        self.entities.get_models(app_label).into_iter().any(|set| {
            AccessManager::new(Arc::clone(&self.registry), set).verify_able(
                &Ability::VISIBLE,
                ctx,
                &mut Attributes::new(),
            )
        })
    }
}
