//! Catalog registration for the permission access plugin.

use std::sync::Arc;

use access_manager_sdk::{InstanceSet, PluginCatalog, SuperuserBypass};

use crate::domain::{PermissionPlugin, PermissionSource};

/// Catalog identifier; the access manager's default.
pub const PLUGIN_ID: &str = "permission";

/// Register the plugin under [`PLUGIN_ID`], reading permissions from the
/// request context. Superusers bypass the permission checks.
pub fn register_into<S: InstanceSet>(catalog: &mut PluginCatalog<S>) {
    catalog.register(PLUGIN_ID, || {
        Arc::new(SuperuserBypass::new(PermissionPlugin::default()))
    });
}

/// Like [`register_into`], reading permissions from `source`.
pub fn register_with_source<S: InstanceSet>(
    catalog: &mut PluginCatalog<S>,
    source: Arc<dyn PermissionSource>,
) {
    catalog.register(PLUGIN_ID, move || {
        Arc::new(SuperuserBypass::new(PermissionPlugin::from_shared(
            Arc::clone(&source),
        )))
    });
}
