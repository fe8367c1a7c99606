use std::collections::HashMap;
use std::sync::Arc;

use access_manager_sdk::{AccessPlugin, InstanceSet};
use parking_lot::{Mutex, RwLock};

/// Memoized default plugins, keyed by catalog identifier.
///
/// Uses a single-flight pattern so that the factory for an identifier runs at
/// most once even under concurrent first use.
pub struct DefaultPluginSelector<S: InstanceSet> {
    /// Built plugins (read lock on the fast path).
    cached: RwLock<HashMap<String, Arc<dyn AccessPlugin<S>>>>,
    /// Held while a factory runs.
    init_lock: Mutex<()>,
}

impl<S: InstanceSet> Default for DefaultPluginSelector<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: InstanceSet> DefaultPluginSelector<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cached: RwLock::new(HashMap::new()),
            init_lock: Mutex::new(()),
        }
    }

    /// Returns the plugin built for `identifier`, building it with `build` on
    /// first use.
    pub fn get_or_init<F>(&self, identifier: &str, build: F) -> Arc<dyn AccessPlugin<S>>
    where
        F: FnOnce() -> Arc<dyn AccessPlugin<S>>,
    {
        if let Some(plugin) = self.cached.read().get(identifier) {
            return Arc::clone(plugin);
        }

        let _init_guard = self.init_lock.lock();

        // Another caller may have built it while we waited.
        if let Some(plugin) = self.cached.read().get(identifier) {
            return Arc::clone(plugin);
        }

        tracing::info!(plugin = identifier, "Creating default access plugin");
        let plugin = build();
        self.cached
            .write()
            .insert(identifier.to_owned(), Arc::clone(&plugin));
        plugin
    }

    #[must_use]
    pub fn is_cached(&self, identifier: &str) -> bool {
        self.cached.read().contains_key(identifier)
    }

    /// Drops all built plugins.
    ///
    /// Returns `true` if anything was cached.
    pub fn reset(&self) -> bool {
        let _init_guard = self.init_lock.lock();
        let mut guard = self.cached.write();
        let had_any = !guard.is_empty();
        guard.clear();
        had_any
    }
}
