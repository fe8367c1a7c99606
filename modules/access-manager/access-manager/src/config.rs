//! Configuration for the access manager.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// Environment variable prefix for overrides, e.g. `ACCESS__DEFAULT_PLUGIN`.
pub const ENV_PREFIX: &str = "ACCESS__";

/// Configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessManagerConfig {
    /// Catalog identifier of the plugin used when an entity has no
    /// registration of its own, or its plugin lacks an ability.
    pub default_plugin: String,
}

impl Default for AccessManagerConfig {
    fn default() -> Self {
        Self {
            default_plugin: "permission".to_owned(),
        }
    }
}

impl AccessManagerConfig {
    /// Load from defaults, then the optional YAML file, then `ACCESS__*`
    /// environment variables. Later sources win.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Config`] if a source cannot be read or contains
    ///   unknown keys
    pub fn load(path: Option<&Path>) -> Result<Self, AccessError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        Self::from_figment(&figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract from a caller-assembled figment.
    ///
    /// # Errors
    ///
    /// - [`AccessError::Config`] if extraction fails
    pub fn from_figment(figment: &Figment) -> Result<Self, AccessError> {
        let config: Self = figment.extract().map_err(|e| AccessError::Config(Box::new(e)))?;
        tracing::debug!(default_plugin = %config.default_plugin, "Loaded access manager config");
        Ok(config)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_to_permission_plugin() {
        Jail::expect_with(|_jail| {
            let config = AccessManagerConfig::load(None).unwrap();
            assert_eq!(config.default_plugin, "permission");
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_default() {
        Jail::expect_with(|jail| {
            jail.create_file("access.yaml", "default_plugin: audited\n")?;
            let config = AccessManagerConfig::load(Some(Path::new("access.yaml"))).unwrap();
            assert_eq!(config.default_plugin, "audited");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("access.yaml", "default_plugin: audited\n")?;
            jail.set_env("ACCESS__DEFAULT_PLUGIN", "strict");
            let config = AccessManagerConfig::load(Some(Path::new("access.yaml"))).unwrap();
            assert_eq!(config.default_plugin, "strict");
            Ok(())
        });
    }

    #[test]
    fn unknown_key_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("access.yaml", "default_plugni: typo\n")?;
            let err = AccessManagerConfig::load(Some(Path::new("access.yaml"))).unwrap_err();
            assert!(matches!(err, AccessError::Config(_)));
            Ok(())
        });
    }
}
