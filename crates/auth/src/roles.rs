use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::RoleId;

use crate::registry::{GUARD_NAME, SystemRole};

/// Stored role record.
///
/// Role names are free-form strings, unique per guard context. The roles from
/// [`SystemRole`] are seeded at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub guard_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            guard_name: GUARD_NAME.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_protected(&self) -> bool {
        SystemRole::is_protected_name(&self.name)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating or updating a role.
///
/// `permissions` replaces the role's whole permission set; `None` and an empty
/// list both clear it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleInput {
    pub name: String,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}
