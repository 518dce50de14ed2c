//! Identity registry: the closed set of permission and role identifiers.
//!
//! Strings only appear at the storage/wire boundary; everything inside the
//! workspace matches on these enums so adding an identifier is a compile-time
//! change.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Guard context every permission and role belongs to.
pub const GUARD_NAME: &str = "web";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} identifier '{value}'")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

/// Resource a permission applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    User,
    Role,
    Permission,
}

/// Action a permission grants on its resource.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Permission identifier (`"<resource>.<action>"` on the wire).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum PermissionName {
    UserCreate,
    UserRead,
    UserUpdate,
    UserDelete,
    RoleCreate,
    RoleRead,
    RoleUpdate,
    RoleDelete,
    PermissionCreate,
    PermissionRead,
    PermissionUpdate,
    PermissionDelete,
}

impl PermissionName {
    pub const ALL: [PermissionName; 12] = [
        PermissionName::UserCreate,
        PermissionName::UserRead,
        PermissionName::UserUpdate,
        PermissionName::UserDelete,
        PermissionName::RoleCreate,
        PermissionName::RoleRead,
        PermissionName::RoleUpdate,
        PermissionName::RoleDelete,
        PermissionName::PermissionCreate,
        PermissionName::PermissionRead,
        PermissionName::PermissionUpdate,
        PermissionName::PermissionDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionName::UserCreate => "user.create",
            PermissionName::UserRead => "user.read",
            PermissionName::UserUpdate => "user.update",
            PermissionName::UserDelete => "user.delete",
            PermissionName::RoleCreate => "role.create",
            PermissionName::RoleRead => "role.read",
            PermissionName::RoleUpdate => "role.update",
            PermissionName::RoleDelete => "role.delete",
            PermissionName::PermissionCreate => "permission.create",
            PermissionName::PermissionRead => "permission.read",
            PermissionName::PermissionUpdate => "permission.update",
            PermissionName::PermissionDelete => "permission.delete",
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            PermissionName::UserCreate
            | PermissionName::UserRead
            | PermissionName::UserUpdate
            | PermissionName::UserDelete => Resource::User,
            PermissionName::RoleCreate
            | PermissionName::RoleRead
            | PermissionName::RoleUpdate
            | PermissionName::RoleDelete => Resource::Role,
            PermissionName::PermissionCreate
            | PermissionName::PermissionRead
            | PermissionName::PermissionUpdate
            | PermissionName::PermissionDelete => Resource::Permission,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            PermissionName::UserCreate
            | PermissionName::RoleCreate
            | PermissionName::PermissionCreate => Action::Create,
            PermissionName::UserRead | PermissionName::RoleRead | PermissionName::PermissionRead => {
                Action::Read
            }
            PermissionName::UserUpdate
            | PermissionName::RoleUpdate
            | PermissionName::PermissionUpdate => Action::Update,
            PermissionName::UserDelete
            | PermissionName::RoleDelete
            | PermissionName::PermissionDelete => Action::Delete,
        }
    }
}

impl FromStr for PermissionName {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownIdentifier {
                kind: "permission",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for PermissionName {
    type Error = UnknownIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PermissionName> for &'static str {
    fn from(value: PermissionName) -> Self {
        value.as_str()
    }
}

impl AsRef<str> for PermissionName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::fmt::Display for PermissionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles every installation is seeded with.
///
/// Custom roles (e.g. "editor") live only in the store; these two are known at
/// compile time and `Admin` is protected from deletion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum SystemRole {
    Admin,
    User,
}

impl SystemRole {
    pub const ALL: [SystemRole; 2] = [SystemRole::Admin, SystemRole::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::User => "user",
        }
    }

    /// Whether a role with this name may never be deleted.
    pub fn is_protected_name(name: &str) -> bool {
        name == SystemRole::Admin.as_str()
    }
}

impl FromStr for SystemRole {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SystemRole::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownIdentifier {
                kind: "role",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for SystemRole {
    type Error = UnknownIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SystemRole> for &'static str {
    fn from(value: SystemRole) -> Self {
        value.as_str()
    }
}

impl AsRef<str> for SystemRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_twelve_unique_permissions() {
        let mut names: Vec<&str> = PermissionName::ALL.iter().map(|p| p.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn permission_names_parse_back() {
        for p in PermissionName::ALL {
            assert_eq!(p.as_str().parse::<PermissionName>().unwrap(), p);
            let (resource, action) = p.as_str().split_once('.').unwrap();
            assert_eq!(serde_json::to_value(p.resource()).unwrap(), resource);
            assert_eq!(serde_json::to_value(p.action()).unwrap(), action);
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        let err = "user.fly".parse::<PermissionName>().unwrap_err();
        assert_eq!(err.kind, "permission");
        assert!(serde_json::from_str::<PermissionName>("\"role.publish\"").is_err());
    }

    #[test]
    fn serializes_as_plain_strings() {
        let json = serde_json::to_string(&vec![PermissionName::RoleRead]).unwrap();
        assert_eq!(json, r#"["role.read"]"#);
        let role: SystemRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, SystemRole::Admin);
    }

    #[test]
    fn only_admin_is_protected() {
        assert!(SystemRole::is_protected_name("admin"));
        assert!(!SystemRole::is_protected_name("user"));
        assert!(!SystemRole::is_protected_name("Admin"));
    }
}
