//! Error types for the access manager SDK.

use thiserror::Error;

/// Errors produced when parsing ability or dispatch names.
///
/// Access denial is never an error: verify returns `false` and apply returns
/// an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityError {
    /// Ability name is empty (e.g. `"verify_"`).
    #[error("ability name is empty")]
    Empty,

    /// Ability name starts with a dispatch prefix.
    #[error("ability `{name}` starts with reserved prefix `{prefix}`")]
    ReservedPrefix { name: String, prefix: &'static str },

    /// Dispatch name has none of the `verify_`, `apply_`, `check_` prefixes.
    #[error("unknown dispatch name `{0}`")]
    UnknownPrefix(String),
}
