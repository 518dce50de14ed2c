//! Capability evaluator over an [`AuthSnapshot`].
//!
//! - No IO
//! - No panics
//! - No caching: every call re-reads the borrowed snapshot

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{PermissionName, SystemRole};
use crate::snapshot::{AuthSnapshot, SnapshotUser};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// A single name or a list of names, as accepted by [`Capabilities::can`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<PermissionName> for OneOrMany {
    fn from(value: PermissionName) -> Self {
        Self::One(value.as_str().to_string())
    }
}

impl From<SystemRole> for OneOrMany {
    fn from(value: SystemRole) -> Self {
        Self::One(value.as_str().to_string())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for OneOrMany {
    fn from(value: Vec<S>) -> Self {
        Self::Many(value.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Combined role/permission requirement.
///
/// `require_all` selects AND over OR both inside each list and between the
/// role check and the permission check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanRequest {
    #[serde(default)]
    pub role: Option<OneOrMany>,
    #[serde(default)]
    pub permission: Option<OneOrMany>,
    #[serde(default, alias = "requireAll")]
    pub require_all: bool,
}

impl CanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: impl Into<OneOrMany>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn permission(mut self, permission: impl Into<OneOrMany>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }
}

/// Borrowing evaluator for one snapshot.
#[derive(Debug, Copy, Clone)]
pub struct Capabilities<'a> {
    snapshot: &'a AuthSnapshot,
}

impl<'a> Capabilities<'a> {
    pub fn new(snapshot: &'a AuthSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &'a AuthSnapshot {
        self.snapshot
    }

    pub fn user(&self) -> Option<&'a SnapshotUser> {
        self.snapshot.user.as_ref()
    }

    /// Role names of the current user; empty when unauthenticated.
    pub fn roles(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.snapshot
            .user
            .iter()
            .flat_map(|u| u.roles.iter().map(|r| r.name.as_str()))
    }

    pub fn permissions(&self) -> &'a [String] {
        &self.snapshot.permissions
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(SystemRole::Admin)
    }

    pub fn has_role(&self, role: impl AsRef<str>) -> bool {
        let role = role.as_ref();
        self.roles().any(|r| r == role)
    }

    pub fn has_any_role<I>(&self, roles: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        roles.into_iter().any(|r| self.has_role(r))
    }

    pub fn has_all_roles<I>(&self, roles: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        roles.into_iter().all(|r| self.has_role(r))
    }

    pub fn has_permission(&self, permission: impl AsRef<str>) -> bool {
        let permission = permission.as_ref();
        self.snapshot.permissions.iter().any(|p| p == permission)
    }

    pub fn has_any_permission<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        permissions.into_iter().any(|p| self.has_permission(p))
    }

    pub fn has_all_permissions<I>(&self, permissions: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        permissions.into_iter().all(|p| self.has_permission(p))
    }

    /// Combined role/permission check.
    ///
    /// An omitted requirement (or an empty single name) is satisfied. Lists
    /// use ALL when `require_all` is set and ANY otherwise; the two checks are
    /// then joined with AND or OR by the same flag.
    pub fn can(&self, request: &CanRequest) -> bool {
        let require_all = request.require_all;

        let role_check = match &request.role {
            None => true,
            Some(OneOrMany::One(name)) if name.is_empty() => true,
            Some(OneOrMany::One(name)) => self.has_role(name),
            Some(OneOrMany::Many(names)) if require_all => self.has_all_roles(names),
            Some(OneOrMany::Many(names)) => self.has_any_role(names),
        };

        let permission_check = match &request.permission {
            None => true,
            Some(OneOrMany::One(name)) if name.is_empty() => true,
            Some(OneOrMany::One(name)) => self.has_permission(name),
            Some(OneOrMany::Many(names)) if require_all => self.has_all_permissions(names),
            Some(OneOrMany::Many(names)) => self.has_any_permission(names),
        };

        if require_all {
            role_check && permission_check
        } else {
            role_check || permission_check
        }
    }

    /// Guard form of [`Capabilities::has_permission`] for boundary code.
    pub fn require_permission(&self, required: PermissionName) -> Result<(), AuthzError> {
        if !self.is_authenticated() {
            return Err(AuthzError::Unauthenticated);
        }
        if self.has_permission(required) {
            Ok(())
        } else {
            tracing::debug!(permission = %required, "permission check denied");
            Err(AuthzError::Forbidden(required.as_str().to_string()))
        }
    }
}
