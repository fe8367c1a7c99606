#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Permission Access Plugin
//!
//! Default plugin of the access manager. Maps abilities to permission
//! codenames granted to the subject:
//!
//! | ability      | verify                     | apply                   |
//! |--------------|----------------------------|-------------------------|
//! | `appendable` | `add_<model>`              | all or nothing          |
//! | `changeable` | `change_<model>`           | all or nothing          |
//! | `deleteable` | `delete_<model>`           | all or nothing          |
//! | `visible`    | any permission on the model | all                    |
//! | other        | `<ability>_<model>`        | all or nothing          |
//!
//! ## Configuration
//!
//! ```yaml
//! default_plugin: permission
//! ```

pub mod domain;
pub mod module;

pub use domain::{ContextPermissions, PermissionPlugin, PermissionSource};
pub use module::{PLUGIN_ID, register_into, register_with_source};
