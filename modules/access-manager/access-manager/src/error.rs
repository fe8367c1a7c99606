//! Errors for the access manager.

use access_manager_sdk::{AbilityError, EntityType};

/// Configuration and registration errors.
///
/// Access denial is not an error: verify returns `false`, apply and the
/// facade methods return an empty set.
#[derive(thiserror::Error, Debug)]
pub enum AccessError {
    /// The configured default plugin identifier is not in the catalog.
    #[error("unknown default plugin '{identifier}' (known: {known})")]
    UnknownDefaultPlugin { identifier: String, known: String },

    /// `unregister` was called for an entity without a registration.
    #[error("no plugin registered for {entity}")]
    NotRegistered { entity: EntityType },

    /// A dispatch name could not be parsed.
    #[error("invalid dispatch name '{name}'")]
    Dispatch {
        name: String,
        #[source]
        source: AbilityError,
    },

    /// A dispatch name addressed the other side of the protocol.
    #[error("dispatch name '{name}' does not start with '{expected}'")]
    WrongDispatch { name: String, expected: &'static str },

    #[error("invalid access manager configuration: {0}")]
    Config(#[source] Box<figment::Error>),
}
