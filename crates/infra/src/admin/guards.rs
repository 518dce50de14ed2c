//! Mutation-time invariants checked before a delete is committed.

use warden_auth::Role;
use warden_core::{DomainError, DomainResult, UserId};

use crate::store::AuthTables;

/// A role may be deleted only when no user holds it and it is not the admin role.
///
/// The in-use check runs first, so a populated admin role reports `RoleInUse`.
pub fn ensure_role_deletable(tables: &AuthTables, role: &Role) -> DomainResult<()> {
    let users = tables.role_users_count(role.id);
    if users > 0 {
        return Err(DomainError::RoleInUse {
            role: role.name.clone(),
            users,
        });
    }
    if role.is_protected() {
        return Err(DomainError::ProtectedRole(role.name.clone()));
    }
    Ok(())
}

/// The reserved admin role keeps its name.
pub fn ensure_role_renamable(role: &Role, new_name: &str) -> DomainResult<()> {
    if role.is_protected() && role.name != new_name {
        return Err(DomainError::ProtectedRole(role.name.clone()));
    }
    Ok(())
}

/// The admin deletion action never targets the acting user.
pub fn ensure_not_self(actor: UserId, target: UserId) -> DomainResult<()> {
    if actor == target {
        return Err(DomainError::SelfDeletion);
    }
    Ok(())
}
