//! Entity type identifiers and the inheritance relation between them.

use std::collections::HashMap;
use std::fmt;

/// Identifier of an application data model: `app_label.model_name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityType {
    app_label: String,
    model_name: String,
}

impl EntityType {
    /// The model name is stored lowercased, matching permission codenames.
    #[must_use]
    pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            model_name: model_name.into().to_lowercase(),
        }
    }

    #[must_use]
    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model_name)
    }
}

/// Direct base types of an entity type, in resolution order.
///
/// Supplied by the application; the registry walks it depth-first when an
/// entity has no direct registration.
pub trait TypeHierarchy: Send + Sync {
    fn bases_of(&self, entity: &EntityType) -> Vec<EntityType>;
}

/// Hierarchy without any inheritance.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatHierarchy;

impl TypeHierarchy for FlatHierarchy {
    fn bases_of(&self, _entity: &EntityType) -> Vec<EntityType> {
        Vec::new()
    }
}

/// Table-backed hierarchy.
#[derive(Clone, Debug, Default)]
pub struct StaticHierarchy {
    bases: HashMap<EntityType, Vec<EntityType>>,
}

impl StaticHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `entity`'s direct bases, replacing any previous declaration.
    #[must_use]
    pub fn with_bases(mut self, entity: EntityType, bases: Vec<EntityType>) -> Self {
        self.bases.insert(entity, bases);
        self
    }
}

impl TypeHierarchy for StaticHierarchy {
    fn bases_of(&self, entity: &EntityType) -> Vec<EntityType> {
        self.bases.get(entity).cloned().unwrap_or_default()
    }
}

impl<F> TypeHierarchy for F
where
    F: Fn(&EntityType) -> Vec<EntityType> + Send + Sync,
{
    fn bases_of(&self, entity: &EntityType) -> Vec<EntityType> {
        self(entity)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn display_and_lowercase_model() {
        let e = EntityType::new("docs", "Document");
        assert_eq!(e.model_name(), "document");
        assert_eq!(e.to_string(), "docs.document");
    }

    #[test]
    fn static_hierarchy_returns_declared_bases() {
        let base = EntityType::new("core", "node");
        let child = EntityType::new("docs", "doc");
        let h = StaticHierarchy::new().with_bases(child.clone(), vec![base.clone()]);

        assert_eq!(h.bases_of(&child), vec![base.clone()]);
        assert!(h.bases_of(&base).is_empty());
    }

    #[test]
    fn closure_acts_as_hierarchy() {
        let base = EntityType::new("core", "node");
        let b = base.clone();
        let h = move |_: &EntityType| vec![b.clone()];

        assert_eq!(h.bases_of(&EntityType::new("docs", "doc")), vec![base]);
    }
}
