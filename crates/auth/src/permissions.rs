use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::PermissionId;

use crate::registry::{GUARD_NAME, PermissionName};

/// Stored permission record.
///
/// The name is always a registry identifier; renaming moves the record to
/// another identifier rather than introducing a new string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: PermissionName,
    pub guard_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(name: PermissionName, now: DateTime<Utc>) -> Self {
        Self {
            id: PermissionId::new(),
            name,
            guard_name: GUARD_NAME.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating or renaming a permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionInput {
    pub name: String,
}
