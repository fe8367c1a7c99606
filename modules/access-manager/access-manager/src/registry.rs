//! Entity type to plugin bindings with inheritance-aware lookup.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use access_manager_sdk::{
    AccessPlugin, EntityType, FlatHierarchy, InstanceSet, PluginCatalog, PluginFactory,
    TypeHierarchy,
};
use parking_lot::RwLock;

use crate::config::AccessManagerConfig;
use crate::error::AccessError;
use crate::selector::DefaultPluginSelector;

/// Registry of access plugins for one family of instance sets.
///
/// Built once at startup and shared through `Arc`. Bindings can still be
/// changed at runtime; lookups take a read lock.
pub struct AccessRegistry<S: InstanceSet> {
    bindings: RwLock<HashMap<EntityType, Arc<dyn AccessPlugin<S>>>>,
    hierarchy: Arc<dyn TypeHierarchy>,
    catalog: PluginCatalog<S>,
    default_identifier: String,
    default_factory: PluginFactory<S>,
    selector: DefaultPluginSelector<S>,
}

/// Builder for [`AccessRegistry`].
pub struct AccessRegistryBuilder<S: InstanceSet> {
    catalog: PluginCatalog<S>,
    hierarchy: Arc<dyn TypeHierarchy>,
    default_identifier: String,
    bindings: Vec<(EntityType, Arc<dyn AccessPlugin<S>>)>,
}

impl<S: InstanceSet> AccessRegistryBuilder<S> {
    /// Base-type relation used by [`AccessRegistry::resolve`]. Defaults to
    /// [`FlatHierarchy`].
    #[must_use]
    pub fn hierarchy(mut self, hierarchy: impl TypeHierarchy + 'static) -> Self {
        self.hierarchy = Arc::new(hierarchy);
        self
    }

    #[must_use]
    pub fn default_plugin(mut self, identifier: impl Into<String>) -> Self {
        self.default_identifier = identifier.into();
        self
    }

    /// Take the default plugin identifier from `config`.
    #[must_use]
    pub fn config(self, config: &AccessManagerConfig) -> Self {
        self.default_plugin(config.default_plugin.clone())
    }

    /// Initial binding, applied on [`build`](Self::build).
    #[must_use]
    pub fn register(mut self, entity: EntityType, plugin: Arc<dyn AccessPlugin<S>>) -> Self {
        self.bindings.push((entity, plugin));
        self
    }

    /// Build the registry.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownDefaultPlugin`] if the default identifier is
    ///   not in the catalog
    pub fn build(self) -> Result<AccessRegistry<S>, AccessError> {
        let default_factory = lookup_factory(&self.catalog, &self.default_identifier)?;
        let registry = AccessRegistry {
            bindings: RwLock::new(HashMap::new()),
            hierarchy: self.hierarchy,
            catalog: self.catalog,
            default_identifier: self.default_identifier,
            default_factory,
            selector: DefaultPluginSelector::new(),
        };
        registry.register_many(self.bindings);
        Ok(registry)
    }
}

fn lookup_factory<S: InstanceSet>(
    catalog: &PluginCatalog<S>,
    identifier: &str,
) -> Result<PluginFactory<S>, AccessError> {
    catalog.get(identifier).ok_or_else(|| {
        tracing::error!(plugin = identifier, "Unknown default access plugin");
        AccessError::UnknownDefaultPlugin {
            identifier: identifier.to_owned(),
            known: catalog.identifiers().join(", "),
        }
    })
}

impl<S: InstanceSet> AccessRegistry<S> {
    /// Start building a registry whose default plugin comes from `catalog`.
    #[must_use]
    pub fn builder(catalog: PluginCatalog<S>) -> AccessRegistryBuilder<S> {
        AccessRegistryBuilder {
            catalog,
            hierarchy: Arc::new(FlatHierarchy),
            default_identifier: AccessManagerConfig::default().default_plugin,
            bindings: Vec::new(),
        }
    }

    /// Bind `plugin` to `entity`, replacing any previous binding.
    ///
    /// Only one plugin per entity; combine several with a `CompoundPlugin`.
    pub fn register(&self, entity: EntityType, plugin: Arc<dyn AccessPlugin<S>>) {
        tracing::info!(entity = %entity, plugin = plugin.name(), "Access plugin registered");
        self.bindings.write().insert(entity, plugin);
    }

    pub fn register_many<I>(&self, plugins: I)
    where
        I: IntoIterator<Item = (EntityType, Arc<dyn AccessPlugin<S>>)>,
    {
        for (entity, plugin) in plugins {
            self.register(entity, plugin);
        }
    }

    /// Remove the binding for `entity` and return it.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotRegistered`] if `entity` has no direct binding
    pub fn unregister(&self, entity: &EntityType) -> Result<Arc<dyn AccessPlugin<S>>, AccessError> {
        let removed = self.bindings.write().remove(entity);
        match removed {
            Some(plugin) => {
                tracing::info!(entity = %entity, "Access plugin unregistered");
                Ok(plugin)
            }
            None => Err(AccessError::NotRegistered {
                entity: entity.clone(),
            }),
        }
    }

    /// Unregister each entity in order, stopping at the first one without a
    /// binding. Entities before it stay unregistered.
    ///
    /// # Errors
    ///
    /// - [`AccessError::NotRegistered`] for the first entity without a binding
    pub fn unregister_many<'a, I>(&self, entities: I) -> Result<(), AccessError>
    where
        I: IntoIterator<Item = &'a EntityType>,
    {
        for entity in entities {
            self.unregister(entity)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, entity: &EntityType) -> bool {
        self.bindings.read().contains_key(entity)
    }

    /// Directly registered entities, sorted.
    #[must_use]
    pub fn registered(&self) -> Vec<EntityType> {
        let mut entities: Vec<_> = self.bindings.read().keys().cloned().collect();
        entities.sort_unstable();
        entities
    }

    /// Find the plugin for `entity`: its own binding, else the first binding
    /// found walking its bases depth-first. Cycles in the base relation are
    /// tolerated.
    ///
    /// The bindings lock is not held while the hierarchy is queried, so
    /// `bases_of` may call back into the registry.
    #[tracing::instrument(skip_all, fields(entity = %entity))]
    pub fn resolve(&self, entity: &EntityType) -> Option<Arc<dyn AccessPlugin<S>>> {
        let mut visited = HashSet::new();
        let mut stack = vec![entity.clone()];

        while let Some(current) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let bound = self.bindings.read().get(&current).cloned();
            if let Some(plugin) = bound {
                tracing::debug!(found_on = %current, plugin = plugin.name(), "Resolved access plugin");
                return Some(plugin);
            }
            let bases = self.hierarchy.bases_of(&current);
            stack.extend(bases.into_iter().rev());
        }

        tracing::debug!("No access plugin registered");
        None
    }

    /// The configured default plugin, built on first use.
    pub fn default_plugin(&self) -> Arc<dyn AccessPlugin<S>> {
        self.selector
            .get_or_init(&self.default_identifier, || (self.default_factory)())
    }

    /// The default plugin for another catalog identifier, built on first use.
    ///
    /// # Errors
    ///
    /// - [`AccessError::UnknownDefaultPlugin`] if `identifier` is not in the
    ///   catalog
    pub fn default_plugin_for(
        &self,
        identifier: &str,
    ) -> Result<Arc<dyn AccessPlugin<S>>, AccessError> {
        let factory = lookup_factory(&self.catalog, identifier)?;
        Ok(self.selector.get_or_init(identifier, || factory()))
    }

    #[must_use]
    pub fn default_identifier(&self) -> &str {
        &self.default_identifier
    }

    /// Drop memoized default plugins; the next lookup rebuilds them.
    ///
    /// Returns `true` if anything was cached.
    pub fn reset_default_plugins(&self) -> bool {
        self.selector.reset()
    }
}

impl<S: InstanceSet> fmt::Debug for AccessRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessRegistry")
            .field("registered", &self.registered())
            .field("default_identifier", &self.default_identifier)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
