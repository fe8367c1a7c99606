//! Ability names and prefixed dispatch names.
//!
//! An [`Ability`] is an open-ended operation name. The four well-known
//! abilities are used by administrative call sites; any other name is
//! dispatched the same way.
//!
//! Call sites that receive a dispatch name as a string (`verify_visible`,
//! `apply_publishable`, legacy `check_appendable`) parse it with
//! [`AbilityCall::parse`].

use std::borrow::Cow;
use std::fmt;

use crate::error::AbilityError;

/// Named operation class subject to authorization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ability(Cow<'static, str>);

impl Ability {
    /// Model-level visibility and instance-set narrowing for listing.
    pub const VISIBLE: Ability = Ability(Cow::Borrowed("visible"));
    pub const CHANGEABLE: Ability = Ability(Cow::Borrowed("changeable"));
    pub const DELETEABLE: Ability = Ability(Cow::Borrowed("deleteable"));
    /// Model-level only; verify may populate default attributes.
    pub const APPENDABLE: Ability = Ability(Cow::Borrowed("appendable"));

    /// Create an ability without validation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Validate and create an ability.
    ///
    /// # Errors
    ///
    /// - [`AbilityError::Empty`] for an empty name
    /// - [`AbilityError::ReservedPrefix`] when the name itself starts with a
    ///   dispatch prefix, which would make `verify_<name>` ambiguous
    pub fn parse(name: &str) -> Result<Self, AbilityError> {
        if name.is_empty() {
            return Err(AbilityError::Empty);
        }
        if let Some(prefix) = DispatchKind::ALL
            .iter()
            .map(|k| k.prefix())
            .find(|p| name.starts_with(p))
        {
            return Err(AbilityError::ReservedPrefix {
                name: name.to_owned(),
                prefix,
            });
        }
        Ok(Self::new(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for one of the four well-known abilities.
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        [
            Self::VISIBLE,
            Self::CHANGEABLE,
            Self::DELETEABLE,
            Self::APPENDABLE,
        ]
        .contains(self)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Ability {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Ability {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for Ability {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which side of the protocol a dispatch name addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchKind {
    /// `verify_<ability>`: model-level check with attribute injection.
    Verify,
    /// `apply_<ability>`: instance-set narrowing.
    Apply,
    /// `check_<ability>`: deprecated model-level check returning attributes.
    Check,
}

impl DispatchKind {
    pub const ALL: [DispatchKind; 3] = [Self::Verify, Self::Apply, Self::Check];

    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Verify => "verify_",
            Self::Apply => "apply_",
            Self::Check => "check_",
        }
    }
}

/// A parsed dispatch name such as `verify_visible`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityCall {
    pub kind: DispatchKind,
    pub ability: Ability,
}

impl AbilityCall {
    /// Parse a prefixed dispatch name.
    ///
    /// Only the first prefix is stripped, so `apply_verify_x` is the `apply`
    /// side of ability `verify_x`, which [`Ability::parse`] then rejects.
    ///
    /// # Errors
    ///
    /// - [`AbilityError::UnknownPrefix`] when no dispatch prefix matches
    /// - errors from [`Ability::parse`] for the remainder
    pub fn parse(name: &str) -> Result<Self, AbilityError> {
        for kind in DispatchKind::ALL {
            if let Some(rest) = name.strip_prefix(kind.prefix()) {
                return Ok(Self {
                    kind,
                    ability: Ability::parse(rest)?,
                });
            }
        }
        Err(AbilityError::UnknownPrefix(name.to_owned()))
    }
}

impl fmt::Display for AbilityCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.ability)
    }
}
