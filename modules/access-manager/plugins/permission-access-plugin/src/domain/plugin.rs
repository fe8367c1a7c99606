//! Permission-codename policy.

use std::sync::Arc;

use access_manager_sdk::{Ability, AccessPlugin, Attributes, EntityType, InstanceSet};
use access_security::RequestContext;

use super::source::{ContextPermissions, PermissionSource};

/// Checks abilities against granted permission codenames.
///
/// - `appendable` / `changeable` / `deleteable`: `add_<model>` /
///   `change_<model>` / `delete_<model>`
/// - `visible`: any permission on the entity; apply keeps every instance
/// - any other ability: `<ability>_<model>`, or the ability name itself when
///   it already ends with `_<model>`
///
/// Handles every ability on both sides. Apply is all-or-nothing: `all()` when
/// the permission is held, else `none()`. Superusers are not special-cased
/// here; the catalog entry wraps the plugin in a `SuperuserBypass`.
#[derive(Clone)]
pub struct PermissionPlugin {
    source: Arc<dyn PermissionSource>,
}

impl Default for PermissionPlugin {
    fn default() -> Self {
        Self::new(ContextPermissions)
    }
}

impl PermissionPlugin {
    #[must_use]
    pub fn new(source: impl PermissionSource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    #[must_use]
    pub fn from_shared(source: Arc<dyn PermissionSource>) -> Self {
        Self { source }
    }

    /// Codename required for `ability` on `entity`; `None` for `visible`,
    /// which accepts any permission. Always names the entity's model.
    #[must_use]
    pub fn codename_for(ability: &Ability, entity: &EntityType) -> Option<String> {
        let suffix = format!("_{}", entity.model_name());
        let right = match ability.as_str() {
            "visible" => return None,
            "appendable" => "add",
            "changeable" => "change",
            "deleteable" => "delete",
            other if other.ends_with(&suffix) => return Some(other.to_owned()),
            other => other,
        };
        Some(format!("{right}{suffix}"))
    }

    fn allowed(&self, ability: &Ability, entity: &EntityType, ctx: &RequestContext) -> bool {
        let allowed = match Self::codename_for(ability, entity) {
            Some(codename) => self.source.has_permission(ctx, entity, &codename),
            None => self.source.has_any_permission(ctx, entity),
        };
        tracing::trace!(entity = %entity, ability = %ability, allowed, "Permission check");
        allowed
    }
}

impl<S: InstanceSet> AccessPlugin<S> for PermissionPlugin {
    fn name(&self) -> &'static str {
        "permission"
    }

    fn verifies(&self, _ability: &Ability) -> bool {
        true
    }

    fn applies(&self, _ability: &Ability) -> bool {
        true
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        _attributes: &mut Attributes,
    ) -> bool {
        self.allowed(ability, entity, ctx)
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        if *ability == Ability::VISIBLE || self.allowed(ability, set.entity(), ctx) {
            set.all()
        } else {
            set.none()
        }
    }
}
