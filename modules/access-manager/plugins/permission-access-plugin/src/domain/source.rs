use access_manager_sdk::EntityType;
use access_security::RequestContext;

/// Where the plugin reads granted permission codenames from.
pub trait PermissionSource: Send + Sync {
    /// Returns `true` if the subject holds `codename` on `entity`.
    fn has_permission(&self, ctx: &RequestContext, entity: &EntityType, codename: &str) -> bool;

    /// Returns `true` if the subject holds any permission on `entity`.
    fn has_any_permission(&self, ctx: &RequestContext, entity: &EntityType) -> bool;
}

/// Reads the `app_label.codename` permissions carried by the request context.
///
/// A codename belongs to an entity when it ends with `_<model_name>`, e.g.
/// `docs.publish_doc` is a permission on `docs.doc`. Codenames that name no
/// model grant nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextPermissions;

impl PermissionSource for ContextPermissions {
    fn has_permission(&self, ctx: &RequestContext, entity: &EntityType, codename: &str) -> bool {
        belongs_to(codename, entity) && ctx.has_permission(entity.app_label(), codename)
    }

    fn has_any_permission(&self, ctx: &RequestContext, entity: &EntityType) -> bool {
        ctx.permissions().iter().any(|p| {
            p.split_once('.').is_some_and(|(app, codename)| {
                app == entity.app_label() && belongs_to(codename, entity)
            })
        })
    }
}

fn belongs_to(codename: &str, entity: &EntityType) -> bool {
    codename
        .strip_suffix(entity.model_name())
        .is_some_and(|right| right.len() > 1 && right.ends_with('_'))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn context_permissions_match_app_and_model() {
        let ctx = RequestContext::builder()
            .permission("docs.view_doc")
            .permission("docs.add_memo")
            .build();
        let doc = EntityType::new("docs", "doc");
        let memo = EntityType::new("docs", "memo");
        let other = EntityType::new("shop", "doc");

        assert!(ContextPermissions.has_permission(&ctx, &doc, "view_doc"));
        assert!(!ContextPermissions.has_permission(&ctx, &doc, "change_doc"));
        assert!(ContextPermissions.has_any_permission(&ctx, &doc));
        assert!(ContextPermissions.has_any_permission(&ctx, &memo));
        assert!(!ContextPermissions.has_any_permission(&ctx, &other));
    }

    #[test]
    fn codenames_without_model_grant_nothing() {
        let ctx = RequestContext::builder()
            .permission("docs.publish")
            .permission("docs.publish_memo")
            .build();
        let doc = EntityType::new("docs", "doc");
        let memo = EntityType::new("docs", "memo");

        assert!(!ContextPermissions.has_permission(&ctx, &doc, "publish"));
        assert!(!ContextPermissions.has_permission(&ctx, &memo, "publish"));
        assert!(!ContextPermissions.has_permission(&ctx, &doc, "publish_memo"));
        assert!(ContextPermissions.has_permission(&ctx, &memo, "publish_memo"));
        assert!(!ContextPermissions.has_any_permission(&ctx, &doc));
        assert!(ContextPermissions.has_any_permission(&ctx, &memo));
    }
}
