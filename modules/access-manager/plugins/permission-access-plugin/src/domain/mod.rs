//! Domain layer for the permission access plugin.

pub mod plugin;
pub mod source;

pub use plugin::PermissionPlugin;
pub use source::{ContextPermissions, PermissionSource};
