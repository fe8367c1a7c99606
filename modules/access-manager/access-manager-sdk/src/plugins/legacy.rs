//! Deprecated `check_<ability>` protocol.
//!
//! A legacy check takes the entity type and the request context and returns
//! either a denial or the default attributes for a new instance. The adapters
//! here turn such checks into verify rules so legacy plugins compose with
//! modern ones. Every adapted call logs a deprecation warning.

use std::sync::Arc;

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;
use crate::plugin_api::{AccessPlugin, VerifyFn};
use crate::plugins::compound::CompoundPlugin;
use crate::plugins::primitives::ApplyAblePlugin;
use crate::plugins::rules::VerifyRules;

/// Result of a legacy check.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Deny,
    Allow,
    /// Allowed, with default attributes to merge into the caller's map.
    Defaults(Attributes),
}

impl CheckOutcome {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Deny)
    }

    /// Attributes to merge; empty unless [`CheckOutcome::Defaults`].
    #[must_use]
    pub fn into_attributes(self) -> Option<Attributes> {
        match self {
            Self::Deny => None,
            Self::Allow => Some(Attributes::new()),
            Self::Defaults(attrs) => Some(attrs),
        }
    }
}

impl From<bool> for CheckOutcome {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

impl From<Attributes> for CheckOutcome {
    fn from(attrs: Attributes) -> Self {
        Self::Defaults(attrs)
    }
}

/// `None` means "allowed without defaults".
impl From<Option<Attributes>> for CheckOutcome {
    fn from(attrs: Option<Attributes>) -> Self {
        attrs.map_or(Self::Allow, Self::Defaults)
    }
}

/// Wrap a legacy check into a verify rule for `ability`.
///
/// `Deny` denies; `Defaults` merges into the attributes and allows; `Allow`
/// allows.
pub fn adapt<F, O>(ability: Ability, check: F) -> VerifyFn
where
    F: Fn(&EntityType, &RequestContext) -> O + Send + Sync + 'static,
    O: Into<CheckOutcome>,
{
    Arc::new(move |entity: &EntityType, ctx: &RequestContext, attributes: &mut Attributes| {
        tracing::warn!(
            ability = %ability,
            entity = %entity,
            "check_{ability} is deprecated, implement verify_{ability} instead"
        );
        match check(entity, ctx).into() {
            CheckOutcome::Deny => false,
            CheckOutcome::Allow => true,
            CheckOutcome::Defaults(defaults) => {
                attributes.merge(defaults);
                true
            }
        }
    })
}

/// Legacy table of `check_<ability>` callables.
///
/// Verify-capable for every ability. The check always runs, so its defaults
/// reach superusers too; a denial is turned into an allow for a superuser.
#[derive(Clone, Default)]
pub struct CheckAblePlugin(VerifyRules);

impl CheckAblePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a legacy check for `ability`.
    #[must_use]
    pub fn check<F, O>(mut self, ability: impl Into<Ability>, check: F) -> Self
    where
        F: Fn(&EntityType, &RequestContext) -> O + Send + Sync + 'static,
        O: Into<CheckOutcome>,
    {
        let ability = ability.into();
        self.0.insert(ability.clone(), adapt(ability, check));
        self
    }
}

impl<S: InstanceSet> AccessPlugin<S> for CheckAblePlugin {
    fn name(&self) -> &'static str {
        "check-able"
    }

    fn verifies(&self, ability: &Ability) -> bool {
        AccessPlugin::<S>::verifies(&self.0, ability)
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        AccessPlugin::<S>::verify_able(&self.0, ability, entity, ctx, attributes)
            || ctx.is_superuser()
    }
}

/// Legacy table of boolean checks. Never populates attributes.
#[derive(Clone, Default)]
pub struct SimpleCheckPlugin(CheckAblePlugin);

impl SimpleCheckPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boolean check for `ability`.
    #[must_use]
    pub fn check<F>(self, ability: impl Into<Ability>, check: F) -> Self
    where
        F: Fn(&EntityType, &RequestContext) -> bool + Send + Sync + 'static,
    {
        Self(self.0.check(ability, check))
    }
}

impl<S: InstanceSet> AccessPlugin<S> for SimpleCheckPlugin {
    fn name(&self) -> &'static str {
        "simple-check"
    }

    fn verifies(&self, ability: &Ability) -> bool {
        AccessPlugin::<S>::verifies(&self.0, ability)
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        AccessPlugin::<S>::verify_able(&self.0, ability, entity, ctx, attributes)
    }
}

/// Legacy checks paired with instance-level rules.
pub struct CheckApplyPlugin<S: InstanceSet>(CompoundPlugin<S>);

impl<S: InstanceSet> CheckApplyPlugin<S> {
    #[must_use]
    pub fn new(check: CheckAblePlugin, apply: ApplyAblePlugin<S>) -> Self {
        Self(CompoundPlugin::new().with(check).with(apply))
    }
}

impl<S: InstanceSet> AccessPlugin<S> for CheckApplyPlugin<S> {
    fn name(&self) -> &'static str {
        "check-apply"
    }

    fn verifies(&self, ability: &Ability) -> bool {
        self.0.verifies(ability)
    }

    fn applies(&self, ability: &Ability) -> bool {
        self.0.applies(ability)
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        self.0.verify_able(ability, entity, ctx, attributes)
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        self.0.apply_able(ability, set, ctx)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use access_security::{Filter, FilterValue, Record, properties};
    use serde_json::json;
    use tracing_test::traced_test;
    use uuid::Uuid;

    use super::*;
    use crate::instance_set::MemorySet;
    use crate::plugins::primitives::VerifyAblePlugin;

    #[derive(Clone, Debug)]
    struct Note {
        owner: Uuid,
    }

    impl Record for Note {
        fn resolve_property(&self, property: &str) -> Vec<FilterValue> {
            match property {
                properties::OWNER_ID => vec![self.owner.into()],
                _ => Vec::new(),
            }
        }
    }

    type Notes = MemorySet<Note>;

    fn entity() -> EntityType {
        EntityType::new("notes", "note")
    }

    fn user() -> RequestContext {
        RequestContext::builder().subject_id(Uuid::new_v4()).build()
    }

    fn owner_defaults(_: &EntityType, ctx: &RequestContext) -> Option<Attributes> {
        Some(Attributes::new().with(properties::OWNER_ID, ctx.subject_id()))
    }

    #[test]
    fn outcome_conversions() {
        assert_eq!(CheckOutcome::from(false), CheckOutcome::Deny);
        assert_eq!(CheckOutcome::from(true), CheckOutcome::Allow);
        assert_eq!(CheckOutcome::from(None::<Attributes>), CheckOutcome::Allow);
        assert!(CheckOutcome::from(Attributes::new()).is_allowed());
        assert_eq!(CheckOutcome::Deny.into_attributes(), None);
    }

    #[traced_test]
    #[test]
    fn adapted_check_injects_defaults_and_warns() {
        let rule = adapt(Ability::APPENDABLE, owner_defaults);
        let ctx = user();
        let mut attrs = Attributes::new().with("title", "memo");

        assert!(rule(&entity(), &ctx, &mut attrs));
        assert_eq!(
            attrs.get(properties::OWNER_ID),
            Some(&json!(ctx.subject_id().to_string()))
        );
        assert_eq!(attrs.get("title"), Some(&json!("memo")));
        assert!(logs_contain("check_appendable is deprecated"));
    }

    #[test]
    fn adapted_denial_leaves_attributes_alone() {
        let rule = adapt(Ability::APPENDABLE, |_: &EntityType, _: &RequestContext| false);
        let mut attrs = Attributes::new();

        assert!(!rule(&entity(), &user(), &mut attrs));
        assert!(attrs.is_empty());
    }

    #[test]
    fn check_plugin_without_check_allows() {
        let p = CheckAblePlugin::new().check(Ability::APPENDABLE, |_: &EntityType, _: &RequestContext| false);
        let mut attrs = Attributes::new();

        assert!(AccessPlugin::<Notes>::verify_able(&p, &Ability::VISIBLE, &entity(), &user(), &mut attrs));
        assert!(!AccessPlugin::<Notes>::verify_able(&p, &Ability::APPENDABLE, &entity(), &user(), &mut attrs));
    }

    #[test]
    fn superuser_still_gets_legacy_defaults() {
        let p = CheckAblePlugin::new().check(Ability::APPENDABLE, owner_defaults);
        let admin = RequestContext::builder()
            .subject_id(Uuid::new_v4())
            .superuser(true)
            .build();
        let mut attrs = Attributes::new();

        assert!(AccessPlugin::<Notes>::verify_able(&p, &Ability::APPENDABLE, &entity(), &admin, &mut attrs));
        assert_eq!(
            attrs.get(properties::OWNER_ID),
            Some(&json!(admin.subject_id().to_string()))
        );
    }

    #[test]
    fn superuser_overrides_legacy_denial() {
        let p = CheckAblePlugin::new().check(Ability::DELETEABLE, |_: &EntityType, _: &RequestContext| false);
        let admin = RequestContext::builder().superuser(true).build();

        assert!(AccessPlugin::<Notes>::verify_able(
            &p,
            &Ability::DELETEABLE,
            &entity(),
            &admin,
            &mut Attributes::new()
        ));
    }

    #[test]
    fn simple_check_plugin_respects_superuser() {
        let p = SimpleCheckPlugin::new().check(Ability::DELETEABLE, |_, _| false);
        let admin = RequestContext::builder().superuser(true).build();
        let mut attrs = Attributes::new();

        assert!(AccessPlugin::<Notes>::verify_able(&p, &Ability::DELETEABLE, &entity(), &admin, &mut attrs));
        assert!(!AccessPlugin::<Notes>::verify_able(&p, &Ability::DELETEABLE, &entity(), &user(), &mut attrs));
    }

    #[test]
    fn legacy_plugin_composes_with_modern_plugins() {
        let legacy = CheckAblePlugin::new().check(Ability::APPENDABLE, owner_defaults);
        let modern = VerifyAblePlugin::new().rule(Ability::APPENDABLE, |_, _, attrs: &mut Attributes| {
            attrs.contains_key(properties::OWNER_ID)
        });
        let p = CompoundPlugin::<Notes>::new().with(legacy).with(modern);
        let mut attrs = Attributes::new();

        assert!(p.verify_able(&Ability::APPENDABLE, &entity(), &user(), &mut attrs));
        assert!(attrs.contains_key(properties::OWNER_ID));
    }

    #[test]
    fn check_apply_plugin_checks_then_narrows() {
        let ctx = user();
        let notes = MemorySet::new(
            entity(),
            vec![Note { owner: ctx.subject_id() }, Note { owner: Uuid::new_v4() }],
        );
        let p = CheckApplyPlugin::new(
            CheckAblePlugin::new().check(Ability::CHANGEABLE, |_: &EntityType, ctx: &RequestContext| {
                ctx.is_authenticated()
            }),
            ApplyAblePlugin::new().rule(Ability::CHANGEABLE, |s: Notes, ctx| {
                s.filter(Filter::eq(properties::OWNER_ID, ctx.subject_id()))
            }),
        );

        assert!(p.verify_able(&Ability::CHANGEABLE, &entity(), &ctx, &mut Attributes::new()));
        assert!(!p.verify_able(
            &Ability::CHANGEABLE,
            &entity(),
            &RequestContext::anonymous(),
            &mut Attributes::new()
        ));
        assert_eq!(p.apply_able(&Ability::CHANGEABLE, notes, &ctx).count(), 1);
    }
}
