//! Default attributes populated by verify.

use std::collections::HashMap;
use std::collections::hash_map;

use serde_json::Value;
use uuid::Uuid;

/// Field-name to value map threaded through `verify`.
///
/// Plugins may inject or override defaults for a new instance (e.g. set the
/// owner to the acting subject). Callers must read the map after the call;
/// the manager allocates a fresh one per call unless the caller passes its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes(HashMap<String, Value>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or override a value, returning the previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl IntoAttributeValue) -> Option<Value> {
        self.0.insert(field.into(), value.into_attribute_value())
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl IntoAttributeValue) -> Self {
        self.insert(field, value);
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    /// Merge `other` into `self`; values from `other` win.
    pub fn merge(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> HashMap<String, Value> {
        self.0
    }
}

impl From<HashMap<String, Value>> for Attributes {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: IntoAttributeValue> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into_attribute_value()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Converts a value into an attribute value.
pub trait IntoAttributeValue {
    fn into_attribute_value(self) -> Value;
}

impl IntoAttributeValue for Value {
    fn into_attribute_value(self) -> Value {
        self
    }
}

impl IntoAttributeValue for Uuid {
    fn into_attribute_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoAttributeValue for &Uuid {
    fn into_attribute_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoAttributeValue for &str {
    fn into_attribute_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoAttributeValue for String {
    fn into_attribute_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoAttributeValue for i64 {
    fn into_attribute_value(self) -> Value {
        Value::from(self)
    }
}

impl IntoAttributeValue for bool {
    fn into_attribute_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoAttributeValue for Vec<Uuid> {
    fn into_attribute_value(self) -> Value {
        Value::Array(self.iter().map(IntoAttributeValue::into_attribute_value).collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_overrides_and_returns_previous() {
        let mut attrs = Attributes::new().with("status", "draft");
        let prev = attrs.insert("status", "published");

        assert_eq!(prev, Some(json!("draft")));
        assert_eq!(attrs.get("status"), Some(&json!("published")));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn uuid_values_are_stored_as_strings() {
        let id = Uuid::new_v4();
        let attrs = Attributes::new().with("owner_id", id);

        assert_eq!(attrs.get("owner_id"), Some(&json!(id.to_string())));
    }

    #[test]
    fn merge_prefers_incoming_values() {
        let mut attrs: Attributes = [("a", 1_i64), ("b", 2_i64)].into_iter().collect();
        attrs.merge(Attributes::new().with("b", 3_i64).with("c", true));

        assert_eq!(attrs.get("a"), Some(&json!(1)));
        assert_eq!(attrs.get("b"), Some(&json!(3)));
        assert_eq!(attrs.get("c"), Some(&json!(true)));
    }
}
