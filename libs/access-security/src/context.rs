use std::collections::HashMap;

use uuid::Uuid;

/// `RequestContext` carries the acting principal and ambient request data.
///
/// Built by the caller after authentication and passed unchanged through every
/// `verify`/`apply` call. The access manager never mutates it; plugins only read
/// from it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RequestContext {
    /// Subject ID: the authenticated user, service, or system making the request.
    subject_id: Uuid,
    /// Subject type classification (e.g., "user", "service").
    subject_type: Option<String>,
    /// Privileged subject. Standard plugins grant every ability to it.
    #[serde(default)]
    is_superuser: bool,
    /// Inactive subjects are refused by the permission backend.
    #[serde(default = "default_active")]
    is_active: bool,
    /// Granted permissions as `app_label.codename` (e.g. `"docs.change_doc"`).
    #[serde(default)]
    permissions: Vec<String>,
    /// Groups the subject belongs to.
    #[serde(default)]
    group_ids: Vec<Uuid>,
    /// Additional application-specific properties plugins may inspect.
    #[serde(default)]
    properties: HashMap<String, serde_json::Value>,
}

fn default_active() -> bool {
    true
}

impl RequestContext {
    /// Create a new `RequestContext` builder
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Create an anonymous context: nil subject, no permissions, not privileged.
    #[must_use]
    pub fn anonymous() -> Self {
        RequestContextBuilder::default().build()
    }

    /// Get the subject ID associated with the request
    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    /// Get the subject type classification (e.g., "user", "service").
    #[must_use]
    pub fn subject_type(&self) -> Option<&str> {
        self.subject_type.as_deref()
    }

    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns `true` when the subject is neither anonymous nor inactive.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_active && self.subject_id != Uuid::default()
    }

    /// Granted permissions in `app_label.codename` form.
    #[must_use]
    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    /// Returns `true` if `app_label.codename` is among the granted permissions.
    #[must_use]
    pub fn has_permission(&self, app_label: &str, codename: &str) -> bool {
        self.permissions.iter().any(|p| {
            p.split_once('.')
                .is_some_and(|(app, code)| app == app_label && code == codename)
        })
    }

    #[must_use]
    pub fn group_ids(&self) -> &[Uuid] {
        &self.group_ids
    }

    #[must_use]
    pub fn in_group(&self, group_id: Uuid) -> bool {
        self.group_ids.contains(&group_id)
    }

    /// Look up an application-specific property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

#[derive(Default)]
pub struct RequestContextBuilder {
    subject_id: Option<Uuid>,
    subject_type: Option<String>,
    is_superuser: bool,
    is_active: Option<bool>,
    permissions: Vec<String>,
    group_ids: Vec<Uuid>,
    properties: HashMap<String, serde_json::Value>,
}

impl RequestContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_type(mut self, subject_type: &str) -> Self {
        self.subject_type = Some(subject_type.to_owned());
        self
    }

    #[must_use]
    pub fn superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    #[must_use]
    pub fn group_ids(mut self, group_ids: Vec<Uuid>) -> Self {
        self.group_ids = group_ids;
        self
    }

    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_type: self.subject_type,
            is_superuser: self.is_superuser,
            is_active: self.is_active.unwrap_or(true),
            permissions: self.permissions,
            group_ids: self.group_ids,
            properties: self.properties,
        }
    }
}
