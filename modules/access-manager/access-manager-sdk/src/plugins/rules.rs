//! Ability-keyed rule tables backing the primitive plugins.

use std::collections::HashMap;
use std::sync::Arc;

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;
use crate::plugin_api::{AccessPlugin, ApplyFn, VerifyFn};

/// Table of model-level rules. An ability without a rule is allowed.
#[derive(Clone, Default)]
pub struct VerifyRules {
    rules: HashMap<Ability, VerifyFn>,
}

impl VerifyRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for `ability`, replacing any previous one.
    #[must_use]
    pub fn rule<F>(mut self, ability: impl Into<Ability>, rule: F) -> Self
    where
        F: Fn(&EntityType, &RequestContext, &mut Attributes) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(ability.into(), Arc::new(rule));
        self
    }

    pub fn insert(&mut self, ability: impl Into<Ability>, rule: VerifyFn) {
        self.rules.insert(ability.into(), rule);
    }

    #[must_use]
    pub fn get(&self, ability: &Ability) -> Option<&VerifyFn> {
        self.rules.get(ability)
    }

    #[must_use]
    pub fn contains(&self, ability: &Ability) -> bool {
        self.rules.contains_key(ability)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: InstanceSet> AccessPlugin<S> for VerifyRules {
    fn name(&self) -> &'static str {
        "verify-rules"
    }

    fn verifies(&self, _ability: &Ability) -> bool {
        true
    }

    fn verify_able(
        &self,
        ability: &Ability,
        entity: &EntityType,
        ctx: &RequestContext,
        attributes: &mut Attributes,
    ) -> bool {
        self.rules
            .get(ability)
            .is_none_or(|rule| rule(entity, ctx, attributes))
    }
}

/// Table of instance-level rules. An ability without a rule is the identity.
pub struct ApplyRules<S> {
    rules: HashMap<Ability, ApplyFn<S>>,
}

impl<S: InstanceSet> ApplyRules<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Add a rule for `ability`, replacing any previous one.
    #[must_use]
    pub fn rule<F>(mut self, ability: impl Into<Ability>, rule: F) -> Self
    where
        F: Fn(S, &RequestContext) -> S + Send + Sync + 'static,
    {
        self.rules.insert(ability.into(), Arc::new(rule));
        self
    }

    pub fn insert(&mut self, ability: impl Into<Ability>, rule: ApplyFn<S>) {
        self.rules.insert(ability.into(), rule);
    }

    #[must_use]
    pub fn contains(&self, ability: &Ability) -> bool {
        self.rules.contains_key(ability)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: InstanceSet> Default for ApplyRules<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for ApplyRules<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<S: InstanceSet> AccessPlugin<S> for ApplyRules<S> {
    fn name(&self) -> &'static str {
        "apply-rules"
    }

    fn applies(&self, _ability: &Ability) -> bool {
        true
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        match self.rules.get(ability) {
            Some(rule) => rule(set, ctx),
            None => set,
        }
    }
}
