//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Kind of record an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Permission,
    Role,
    User,
}

impl core::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RecordKind::Permission => f.write_str("permission"),
            RecordKind::Role => f.write_str("role"),
            RecordKind::User => f.write_str("user"),
        }
    }
}

/// Domain-level error.
///
/// Every variant is recoverable: the boundary reports it back to the caller and
/// the failed operation leaves no partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A sync or create request named a role/permission that does not exist.
    #[error("unknown {kind} '{name}'")]
    InvalidReference { kind: RecordKind, name: String },

    /// The role still has users assigned.
    #[error("Cannot delete role with assigned users ('{role}' has {users}).")]
    RoleInUse { role: String, users: usize },

    /// The reserved admin role can never be deleted.
    #[error("Cannot delete the {0} role.")]
    ProtectedRole(String),

    /// The acting user targeted their own account.
    #[error("Cannot delete your own account.")]
    SelfDeletion,

    /// A unique name or email is already taken.
    #[error("the {field} '{value}' has already been taken")]
    UniquenessViolation { field: &'static str, value: String },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested record was not found.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },

    /// The backing store failed (e.g. poisoned lock).
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn invalid_reference(kind: RecordKind, name: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            name: name.into(),
        }
    }

    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        Self::UniquenessViolation {
            field,
            value: value.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(kind: RecordKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_errors_render_user_facing_messages() {
        assert_eq!(
            DomainError::ProtectedRole("admin".to_string()).to_string(),
            "Cannot delete the admin role."
        );
        assert_eq!(
            DomainError::SelfDeletion.to_string(),
            "Cannot delete your own account."
        );
        assert_eq!(
            DomainError::duplicate("email", "a@example.com").to_string(),
            "the email 'a@example.com' has already been taken"
        );
    }

    #[test]
    fn invalid_reference_names_the_kind() {
        let err = DomainError::invalid_reference(RecordKind::Permission, "user.fly");
        assert_eq!(err.to_string(), "unknown permission 'user.fly'");
    }
}
