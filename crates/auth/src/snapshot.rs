//! Read-only view of the current user's authorization state.
//!
//! The shape matches the page context handed to the client:
//! `{ "user": { "id", "roles": [{ "name" }] } | null, "permissions": [..] }`.
//! Permissions arrive already flattened from the user's roles.

use serde::{Deserialize, Serialize};

use warden_core::UserId;

/// Role reference embedded in a snapshot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: String,
}

impl RoleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUser {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
}

/// Immutable authorization snapshot passed explicitly to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthSnapshot {
    #[serde(default)]
    pub user: Option<SnapshotUser>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AuthSnapshot {
    /// Snapshot for an unauthenticated visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user<R, P>(id: UserId, roles: R, permissions: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            user: Some(SnapshotUser {
                id,
                name: None,
                email: None,
                roles: roles.into_iter().map(RoleRef::new).collect(),
            }),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }
}
