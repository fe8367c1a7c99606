//! Table-backed primitive plugins.

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;
use crate::plugin_api::{AccessPlugin, ApplyFn, VerifyFn};
use crate::plugins::rules::{ApplyRules, VerifyRules};
use crate::plugins::superuser::SuperuserBypass;

/// Model-level plugin backed by a [`VerifyRules`] table.
///
/// Claims verify for every ability; an ability without a rule is allowed.
/// Superusers are allowed without consulting the rules.
///
/// ```
/// use access_manager_sdk::{Attributes, VerifyAblePlugin};
///
/// let plugin = VerifyAblePlugin::new().rule("appendable", |_, ctx, attrs: &mut Attributes| {
///     attrs.insert("owner_id", ctx.subject_id());
///     ctx.is_authenticated()
/// });
/// # let _ = plugin;
/// ```
#[derive(Clone, Default)]
pub struct VerifyAblePlugin(SuperuserBypass<VerifyRules>);

impl VerifyAblePlugin {
    /// A plugin without rules: allows everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rules(rules: VerifyRules) -> Self {
        Self(SuperuserBypass::new(rules))
    }

    /// Add a rule for `ability`, replacing any previous one.
    #[must_use]
    pub fn rule<F>(self, ability: impl Into<Ability>, rule: F) -> Self
    where
        F: Fn(&EntityType, &RequestContext, &mut Attributes) -> bool + Send + Sync + 'static,
    {
        Self::from_rules(self.0.into_inner().rule(ability, rule))
    }

    pub fn insert(&mut self, ability: impl Into<Ability>, rule: VerifyFn) {
        self.0.inner_mut().insert(ability, rule);
    }

    #[must_use]
    pub fn rules(&self) -> &VerifyRules {
        self.0.inner()
    }
}

impl<S: InstanceSet> AccessPlugin<S> for VerifyAblePlugin {
    fn name(&self) -> &'static str {
        "verify-able"
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

/// Instance-level plugin backed by an [`ApplyRules`] table.
///
/// Claims apply for every ability; an ability without a rule returns the set
/// unchanged. Superusers get the set unchanged too.
pub struct ApplyAblePlugin<S>(SuperuserBypass<ApplyRules<S>>);

impl<S: InstanceSet> ApplyAblePlugin<S> {
    /// A plugin without rules: the identity for every ability.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rules(ApplyRules::new())
    }

    #[must_use]
    pub fn from_rules(rules: ApplyRules<S>) -> Self {
        Self(SuperuserBypass::new(rules))
    }

    /// Add a rule for `ability`, replacing any previous one.
    #[must_use]
    pub fn rule<F>(self, ability: impl Into<Ability>, rule: F) -> Self
    where
        F: Fn(S, &RequestContext) -> S + Send + Sync + 'static,
    {
        Self::from_rules(self.0.into_inner().rule(ability, rule))
    }

    pub fn insert(&mut self, ability: impl Into<Ability>, rule: ApplyFn<S>) {
        self.0.inner_mut().insert(ability, rule);
    }

    #[must_use]
    pub fn rules(&self) -> &ApplyRules<S> {
        self.0.inner()
    }
}

impl<S: InstanceSet> Default for ApplyAblePlugin<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for ApplyAblePlugin<S> {
    fn clone(&self) -> Self {
        Self(SuperuserBypass::new(self.0.inner().clone()))
    }
}

impl<S: InstanceSet> AccessPlugin<S> for ApplyAblePlugin<S> {
    fn name(&self) -> &'static str {
        "apply-able"
    }

    fn applies(&self, ability: &Ability) -> bool {
        self.0.applies(ability)
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        self.0.apply_able(ability, set, ctx)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use access_security::{Filter, FilterValue, Record};
    use uuid::Uuid;

    use super::*;
    use crate::instance_set::MemorySet;

    #[derive(Clone, Debug)]
    struct Row {
        owner: Uuid,
    }

    impl Record for Row {
        fn resolve_property(&self, property: &str) -> Vec<FilterValue> {
            match property {
                "owner_id" => vec![self.owner.into()],
                _ => Vec::new(),
            }
        }
    }

    type Rows = MemorySet<Row>;

    fn entity() -> EntityType {
        EntityType::new("app", "row")
    }

    fn rows(owners: &[Uuid]) -> Rows {
        MemorySet::new(entity(), owners.iter().map(|&owner| Row { owner }).collect())
    }

    fn user() -> RequestContext {
        RequestContext::builder().subject_id(Uuid::new_v4()).build()
    }

    fn superuser() -> RequestContext {
        RequestContext::builder().subject_id(Uuid::new_v4()).superuser(true).build()
    }

    fn verify(p: &VerifyAblePlugin, ability: &Ability, ctx: &RequestContext) -> bool {
        AccessPlugin::<Rows>::verify_able(p, ability, &entity(), ctx, &mut Attributes::new())
    }

    #[test]
    fn verify_without_rule_allows() {
        let p = VerifyAblePlugin::new();
        assert!(verify(&p, &Ability::CHANGEABLE, &user()));
        assert!(AccessPlugin::<Rows>::verifies(&p, &Ability::new("anything")));
        assert!(!AccessPlugin::<Rows>::applies(&p, &Ability::VISIBLE));
    }

    #[test]
    fn verify_rule_decides() {
        let p = VerifyAblePlugin::new().rule(Ability::DELETEABLE, |_, _, _| false);
        assert!(!verify(&p, &Ability::DELETEABLE, &user()));
        assert!(verify(&p, &Ability::CHANGEABLE, &user()));
    }

    #[test]
    fn superuser_skips_verify_rule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let p = VerifyAblePlugin::new().rule(Ability::VISIBLE, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        assert!(verify(&p, &Ability::VISIBLE, &superuser()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!verify(&p, &Ability::VISIBLE, &user()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn apply_without_rule_is_identity() {
        let p = ApplyAblePlugin::<Rows>::new();
        let set = rows(&[Uuid::new_v4()]).none();
        let out = p.apply_able(&Ability::VISIBLE, set, &user());
        assert!(out.is_empty());
        assert!(p.applies(&Ability::new("publishable")));
        assert!(!p.verifies(&Ability::VISIBLE));
    }

    #[test]
    fn apply_rule_narrows_to_owner() {
        let ctx = user();
        let set = rows(&[ctx.subject_id(), Uuid::new_v4(), ctx.subject_id()]);
        let p = ApplyAblePlugin::<Rows>::new().rule(Ability::CHANGEABLE, |set: Rows, ctx| {
            set.filter(Filter::eq("owner_id", ctx.subject_id()))
        });

        assert_eq!(p.apply_able(&Ability::CHANGEABLE, set.clone(), &ctx).count(), 2);
        assert_eq!(p.apply_able(&Ability::VISIBLE, set, &ctx).count(), 3);
    }

    #[test]
    fn superuser_apply_returns_input_unfiltered() {
        let p = ApplyAblePlugin::<Rows>::new().rule(Ability::VISIBLE, |set: Rows, _| set.none());
        let set = rows(&[Uuid::new_v4(), Uuid::new_v4()]);

        assert_eq!(p.apply_able(&Ability::VISIBLE, set.clone(), &superuser()).count(), 2);
        assert!(p.apply_able(&Ability::VISIBLE, set, &user()).is_empty());
    }
}
