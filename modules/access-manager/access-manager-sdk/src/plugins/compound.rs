//! AND-composition of plugins.

use std::fmt;
use std::sync::Arc;

use access_security::RequestContext;

use crate::ability::Ability;
use crate::attributes::Attributes;
use crate::entity::EntityType;
use crate::instance_set::InstanceSet;
use crate::plugin_api::AccessPlugin;

/// AND-combination of child plugins.
///
/// - verify: children that verify the ability run in order; the first `false`
///   returns `false`. A failing child's attribute changes are discarded, those
///   of earlier children are kept.
/// - apply: children that apply the ability narrow the set in order.
///
/// The compound claims both sides for every ability. With no capable child,
/// verify is `true` and apply is the identity.
pub struct CompoundPlugin<S: InstanceSet> {
    plugins: Vec<Arc<dyn AccessPlugin<S>>>,
}

impl<S: InstanceSet> CompoundPlugin<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a child plugin.
    #[must_use]
    pub fn with(mut self, plugin: impl AccessPlugin<S> + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Append an already shared child plugin.
    #[must_use]
    pub fn with_shared(mut self, plugin: Arc<dyn AccessPlugin<S>>) -> Self {
        self.plugins.push(plugin);
        self
    }

    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn AccessPlugin<S>>] {
        &self.plugins
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<S: InstanceSet> Default for CompoundPlugin<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InstanceSet> Clone for CompoundPlugin<S> {
    fn clone(&self) -> Self {
        Self {
            plugins: self.plugins.clone(),
        }
    }
}

impl<S: InstanceSet> From<Vec<Arc<dyn AccessPlugin<S>>>> for CompoundPlugin<S> {
    fn from(plugins: Vec<Arc<dyn AccessPlugin<S>>>) -> Self {
        Self { plugins }
    }
}

impl<S: InstanceSet> fmt::Debug for CompoundPlugin<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

impl<S: InstanceSet> AccessPlugin<S> for CompoundPlugin<S> {
    fn name(&self) -> &'static str {
        "compound"
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
        attributes: &mut Attributes,
    ) -> bool {
        for plugin in self.plugins.iter().filter(|p| p.verifies(ability)) {
            let mut scratch = attributes.clone();
            if !plugin.verify_able(ability, entity, ctx, &mut scratch) {
                tracing::debug!(
                    plugin = plugin.name(),
                    ability = %ability,
                    entity = %entity,
                    "compound verify denied"
                );
                return false;
            }
            *attributes = scratch;
        }
        true
    }

    fn apply_able(&self, ability: &Ability, set: S, ctx: &RequestContext) -> S {
        self.plugins
            .iter()
            .filter(|p| p.applies(ability))
            .fold(set, |acc, plugin| plugin.apply_able(ability, acc, ctx))
    }
}
