#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access manager.
//!
//! Holds the [`AccessRegistry`] of entity plugins with its memoized default
//! plugin, and the per-entity [`AccessManager`] facade that combines a
//! model-level verify with an instance-level apply.
//!
//! ```ignore
//! let config = AccessManagerConfig::load(Some(Path::new("access.yaml")))?;
//! let mut catalog = PluginCatalog::new();
//! permission_access_plugin::register_into(&mut catalog);
//!
//! let registry = Arc::new(AccessRegistry::builder(catalog).config(&config).build()?);
//! registry.register(doc_entity, Arc::new(doc_plugin));
//!
//! let docs = AccessManager::new(Arc::clone(&registry), all_docs);
//! let visible = docs.visible(&ctx);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod manager;
pub mod registry;
pub mod selector;

pub use backend::{EntityCatalog, PermissionBackend};
pub use config::AccessManagerConfig;
pub use error::AccessError;
pub use manager::{AccessManager, Appendable};
pub use registry::{AccessRegistry, AccessRegistryBuilder};
pub use selector::DefaultPluginSelector;
