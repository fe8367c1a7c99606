use std::fmt;
use uuid::Uuid;

/// A scalar value for instance filtering.
///
/// Used in [`Filter`] predicates and returned by [`Record::resolve_property`].
/// Backends translate these into their own query values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FilterValue {
    /// UUID value (subject IDs, group IDs, resource IDs, etc.)
    Uuid(Uuid),
    /// String value (names, statuses, etc.)
    String(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
}

impl FilterValue {
    /// Try to extract a UUID from this value.
    ///
    /// Returns `Some` for `FilterValue::Uuid` directly, and for
    /// `FilterValue::String` if the string is a valid UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::String(s) => Uuid::parse_str(s).ok(),
            Self::Int(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<Uuid> for FilterValue {
    #[inline]
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<&Uuid> for FilterValue {
    #[inline]
    fn from(u: &Uuid) -> Self {
        Self::Uuid(*u)
    }
}

impl From<String> for FilterValue {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for FilterValue {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<i64> for FilterValue {
    #[inline]
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for FilterValue {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Well-known record property names.
pub mod properties {
    /// Resource identity property. Typically maps to the primary key column.
    pub const RESOURCE_ID: &str = "id";

    /// Owner (user) identity property. Typically maps to an `owner_id` column.
    pub const OWNER_ID: &str = "owner_id";
}

/// A record that can be matched against a [`Filter`].
///
/// `resolve_property` returns every value the record holds for a property:
/// one value for a plain column, several for a to-many relation (e.g. the
/// groups allowed to view a document). An unknown property resolves to no
/// values and therefore never matches.
pub trait Record {
    fn resolve_property(&self, property: &str) -> Vec<FilterValue>;
}

/// A declarative predicate on named record properties.
///
/// - [`Filter::Eq`]: `property = value`
/// - [`Filter::In`]: `property IN (values)`
/// - [`Filter::All`]: conjunction, empty means match-all
/// - [`Filter::Any`]: disjunction, empty means match-none
///
/// For multi-valued properties a record matches `Eq`/`In` when any of its
/// values matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Eq(EqFilter),
    In(InFilter),
    All(Vec<Filter>),
    Any(Vec<Filter>),
}

/// Equality filter: `property = value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EqFilter {
    property: String,
    value: FilterValue,
}

/// Set membership filter: `property IN (values)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFilter {
    property: String,
    values: Vec<FilterValue>,
}

impl EqFilter {
    #[must_use]
    pub fn new(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

impl InFilter {
    /// Create from an iterator of convertible values.
    #[must_use]
    pub fn new<V: Into<FilterValue>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }
}

impl Filter {
    /// Create an equality filter (`property = value`).
    #[must_use]
    pub fn eq(property: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Eq(EqFilter::new(property, value))
    }

    /// Create a set membership filter (`property IN (values)`).
    #[must_use]
    pub fn r#in<V: Into<FilterValue>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(InFilter::new(property, values))
    }

    /// Conjunction of filters.
    #[must_use]
    pub fn all(filters: Vec<Filter>) -> Self {
        Self::All(filters)
    }

    /// Disjunction of filters.
    #[must_use]
    pub fn any(filters: Vec<Filter>) -> Self {
        Self::Any(filters)
    }

    /// Evaluate this filter against a record.
    #[must_use]
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::Eq(f) => record
                .resolve_property(f.property())
                .iter()
                .any(|v| v == f.value()),
            Self::In(f) => record
                .resolve_property(f.property())
                .iter()
                .any(|v| f.values().contains(v)),
            Self::All(filters) => filters.iter().all(|f| f.matches(record)),
            Self::Any(filters) => filters.iter().any(|f| f.matches(record)),
        }
    }

    /// Check if this filter (or any nested filter) references the property.
    #[must_use]
    pub fn has_property(&self, property: &str) -> bool {
        match self {
            Self::Eq(f) => f.property() == property,
            Self::In(f) => f.property() == property,
            Self::All(filters) | Self::Any(filters) => {
                filters.iter().any(|f| f.has_property(property))
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use uuid::Uuid;

    const G1: &str = "11111111-1111-1111-1111-111111111111";
    const G2: &str = "22222222-2222-2222-2222-222222222222";

    fn uid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    struct Doc {
        name: &'static str,
        viewer_groups: Vec<Uuid>,
        archived: bool,
    }

    impl Record for Doc {
        fn resolve_property(&self, property: &str) -> Vec<FilterValue> {
            match property {
                "name" => vec![self.name.into()],
                "viewer_groups" => self.viewer_groups.iter().map(Into::into).collect(),
                "is_archived" => vec![self.archived.into()],
                _ => Vec::new(),
            }
        }
    }

    fn doc() -> Doc {
        Doc {
            name: "report",
            viewer_groups: vec![uid(G1), uid(G2)],
            archived: false,
        }
    }

    #[test]
    fn eq_matches_single_valued_property() {
        assert!(Filter::eq("name", "report").matches(&doc()));
        assert!(!Filter::eq("name", "memo").matches(&doc()));
    }

    #[test]
    fn eq_matches_any_value_of_multi_valued_property() {
        assert!(Filter::eq("viewer_groups", uid(G2)).matches(&doc()));
        assert!(!Filter::eq("viewer_groups", Uuid::new_v4()).matches(&doc()));
    }

    #[test]
    fn in_matches_set_membership() {
        assert!(Filter::r#in("name", ["memo", "report"]).matches(&doc()));
        assert!(!Filter::r#in("name", ["memo"]).matches(&doc()));
    }

    #[test]
    fn unknown_property_never_matches() {
        assert!(!Filter::eq("owner_id", uid(G1)).matches(&doc()));
        assert!(!Filter::r#in("owner_id", [uid(G1)]).matches(&doc()));
    }

    #[test]
    fn all_and_any_compose() {
        let f = Filter::all(vec![
            Filter::eq("is_archived", false),
            Filter::any(vec![
                Filter::eq("viewer_groups", Uuid::new_v4()),
                Filter::eq("viewer_groups", uid(G1)),
            ]),
        ]);
        assert!(f.matches(&doc()));
        assert!(Filter::all(vec![]).matches(&doc()));
        assert!(!Filter::any(vec![]).matches(&doc()));
    }

    #[test]
    fn has_property_looks_into_nested_filters() {
        let f = Filter::all(vec![Filter::any(vec![Filter::eq(properties::OWNER_ID, uid(G1))])]);
        assert!(f.has_property(properties::OWNER_ID));
        assert!(!f.has_property(properties::RESOURCE_ID));
    }

    #[test]
    fn as_uuid_parses_uuid_strings() {
        assert_eq!(FilterValue::from(G1).as_uuid(), Some(uid(G1)));
        assert_eq!(FilterValue::Int(7).as_uuid(), None);
    }
}
