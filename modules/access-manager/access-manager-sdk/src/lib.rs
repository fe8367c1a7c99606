#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access Manager SDK
//!
//! This crate provides the plugin-facing API of the access manager:
//!
//! - [`Ability`], [`AbilityCall`] - Ability names and prefixed dispatch names
//! - [`AccessPlugin`] - Plugin API trait (verify / apply)
//! - [`InstanceSet`], [`MemorySet`] - Filterable instance collections
//! - [`EntityType`], [`TypeHierarchy`] - Entity identifiers and inheritance
//! - [`Attributes`] - Default attributes populated by verify
//! - [`PluginCatalog`] - Identifier to factory table for default plugins
//! - [`plugins`] - Primitives, [`CompoundPlugin`], superuser bypass and the
//!   deprecated check protocol
//!
//! ## Usage
//!
//! ```ignore
//! use access_manager_sdk::{Ability, ApplyAblePlugin, CompoundPlugin, VerifyAblePlugin};
//! use access_security::{Filter, properties};
//!
//! let plugin = CompoundPlugin::new()
//!     .with(VerifyAblePlugin::new().rule(Ability::APPENDABLE, |_, ctx, attrs| {
//!         attrs.insert(properties::OWNER_ID, ctx.subject_id());
//!         ctx.is_authenticated()
//!     }))
//!     .with(ApplyAblePlugin::new().rule(Ability::VISIBLE, |docs: Docs, ctx| {
//!         docs.filter(Filter::eq(properties::OWNER_ID, ctx.subject_id()))
//!     }));
//!
//! registry.register(doc_entity, Arc::new(plugin));
//! ```

pub mod ability;
pub mod attributes;
pub mod catalog;
pub mod entity;
pub mod error;
pub mod instance_set;
pub mod plugin_api;
pub mod plugins;

// Re-export main types at crate root
pub use ability::{Ability, AbilityCall, DispatchKind};
pub use attributes::{Attributes, IntoAttributeValue};
pub use catalog::{PluginCatalog, PluginFactory};
pub use entity::{EntityType, FlatHierarchy, StaticHierarchy, TypeHierarchy};
pub use error::AbilityError;
pub use instance_set::{InstanceSet, MemorySet};
pub use plugin_api::{AccessPlugin, ApplyFn, VerifyFn};
pub use plugins::{
    ApplyAblePlugin, CheckAblePlugin, CheckApplyPlugin, CheckOutcome, CompoundPlugin,
    SimpleCheckPlugin, SuperuserBypass, VerifyAblePlugin,
};
