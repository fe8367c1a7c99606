//! Catalog of default plugin factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::instance_set::InstanceSet;
use crate::plugin_api::AccessPlugin;

/// Builds a plugin instance. Called at most once per identifier by the registry.
pub type PluginFactory<S> = Arc<dyn Fn() -> Arc<dyn AccessPlugin<S>> + Send + Sync>;

/// Identifier to factory table from which the default plugin is selected.
///
/// Plugin crates expose a `register_into(&mut PluginCatalog<S>)` function; the
/// application collects them before building the registry.
pub struct PluginCatalog<S: InstanceSet> {
    factories: HashMap<String, PluginFactory<S>>,
}

impl<S: InstanceSet> PluginCatalog<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Add a factory under `identifier`, replacing any previous one.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn AccessPlugin<S>> + Send + Sync + 'static,
    {
        self.factories.insert(identifier.into(), Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<F>(mut self, identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn AccessPlugin<S>> + Send + Sync + 'static,
    {
        self.register(identifier, factory);
        self
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<PluginFactory<S>> {
        self.factories.get(identifier).cloned()
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: InstanceSet> Default for PluginCatalog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InstanceSet> fmt::Debug for PluginCatalog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}
