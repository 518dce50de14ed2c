//! Relational state of the authorization model.
//!
//! `AuthTables` holds the three record tables plus the two bipartite edge sets
//! (role↔permission, user↔role). It has no locking of its own; callers go
//! through an [`AuthStore`](super::AuthStore), which hands out either a shared
//! view or a transactional working copy.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use warden_auth::{Permission, PermissionName, Role, User, normalize_email};
use warden_core::{DomainError, DomainResult, PermissionId, RecordKind, RoleId, UserId};

/// Edges added and removed by one sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> SyncOutcome<T> {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthTables {
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, Role>,
    users: BTreeMap<UserId, User>,
    role_permissions: BTreeSet<(RoleId, PermissionId)>,
    user_roles: BTreeSet<(UserId, RoleId)>,
}

/// Replace `owner`'s edge set with `target` as an explicit set difference.
///
/// Edges present on both sides are left untouched.
fn sync_edges<A, B>(edges: &mut BTreeSet<(A, B)>, owner: A, target: BTreeSet<B>) -> SyncOutcome<B>
where
    A: Ord + Copy,
    B: Ord + Copy,
{
    let current: BTreeSet<B> = edges
        .iter()
        .filter(|(a, _)| *a == owner)
        .map(|(_, b)| *b)
        .collect();

    let added: Vec<B> = target.difference(&current).copied().collect();
    let removed: Vec<B> = current.difference(&target).copied().collect();

    for b in &removed {
        edges.remove(&(owner, *b));
    }
    for b in &added {
        edges.insert((owner, *b));
    }

    SyncOutcome { added, removed }
}

impl AuthTables {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.values()
    }

    pub fn permission(&self, id: PermissionId) -> DomainResult<&Permission> {
        self.permissions
            .get(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Permission, id))
    }

    pub fn permission_by_name(&self, name: PermissionName) -> Option<&Permission> {
        self.permissions.values().find(|p| p.name == name)
    }

    pub fn insert_permission(&mut self, permission: Permission) -> DomainResult<()> {
        if self
            .permissions
            .values()
            .any(|p| p.name == permission.name && p.guard_name == permission.guard_name)
        {
            return Err(DomainError::duplicate("name", permission.name.as_str()));
        }
        self.permissions.insert(permission.id, permission);
        Ok(())
    }

    pub fn rename_permission(
        &mut self,
        id: PermissionId,
        name: PermissionName,
        now: DateTime<Utc>,
    ) -> DomainResult<&Permission> {
        let guard_name = self.permission(id)?.guard_name.clone();
        if self
            .permissions
            .values()
            .any(|p| p.id != id && p.name == name && p.guard_name == guard_name)
        {
            return Err(DomainError::duplicate("name", name.as_str()));
        }
        let permission = self
            .permissions
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Permission, id))?;
        permission.name = name;
        permission.updated_at = now;
        Ok(permission)
    }

    /// Remove a permission record together with every role edge pointing at it.
    pub fn remove_permission(&mut self, id: PermissionId) -> DomainResult<Permission> {
        self.detach_permission_from_roles(id);
        self.permissions
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Permission, id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────────

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    pub fn role(&self, id: RoleId) -> DomainResult<&Role> {
        self.roles
            .get(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Role, id))
    }

    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.roles.values().find(|r| r.name == name)
    }

    pub fn insert_role(&mut self, role: Role) -> DomainResult<()> {
        if self
            .roles
            .values()
            .any(|r| r.name == role.name && r.guard_name == role.guard_name)
        {
            return Err(DomainError::duplicate("name", role.name));
        }
        self.roles.insert(role.id, role);
        Ok(())
    }

    pub fn rename_role(&mut self, id: RoleId, name: &str, now: DateTime<Utc>) -> DomainResult<&Role> {
        let guard_name = self.role(id)?.guard_name.clone();
        if self
            .roles
            .values()
            .any(|r| r.id != id && r.name == name && r.guard_name == guard_name)
        {
            return Err(DomainError::duplicate("name", name));
        }
        let role = self
            .roles
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Role, id))?;
        if role.name != name {
            role.name = name.to_string();
        }
        role.updated_at = now;
        Ok(role)
    }

    /// Remove a role record. Callers detach edges first; any leftovers are
    /// dropped so no edge ever dangles.
    pub fn remove_role(&mut self, id: RoleId) -> DomainResult<Role> {
        let role = self
            .roles
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::Role, id))?;
        self.role_permissions.retain(|(r, _)| *r != id);
        self.user_roles.retain(|(_, r)| *r != id);
        Ok(role)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user(&self, id: UserId) -> DomainResult<&User> {
        self.users
            .get(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::User, id))
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let normalized = normalize_email(email);
        self.users.values().find(|u| u.email == normalized)
    }

    /// Fails when `email` belongs to any user other than `except`.
    pub fn ensure_email_available(&self, email: &str, except: Option<UserId>) -> DomainResult<()> {
        match self.user_by_email(email) {
            Some(existing) if Some(existing.id) != except => {
                Err(DomainError::duplicate("email", normalize_email(email)))
            }
            _ => Ok(()),
        }
    }

    pub fn insert_user(&mut self, user: User) -> DomainResult<()> {
        self.ensure_email_available(&user.email, None)?;
        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn user_mut(&mut self, id: UserId) -> DomainResult<&mut User> {
        self.users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::User, id))
    }

    pub fn remove_user(&mut self, id: UserId) -> DomainResult<User> {
        let user = self
            .users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(RecordKind::User, id))?;
        self.user_roles.retain(|(u, _)| *u != id);
        Ok(user)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the role's permission set with the named permissions.
    ///
    /// Every name is resolved before any edge changes, so an unknown name
    /// fails the whole sync.
    pub fn sync_role_permissions<I>(
        &mut self,
        role: RoleId,
        names: I,
    ) -> DomainResult<SyncOutcome<PermissionId>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.role(role)?;

        let mut target = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            let id = name
                .parse::<PermissionName>()
                .ok()
                .and_then(|p| self.permission_by_name(p))
                .map(|p| p.id)
                .ok_or_else(|| DomainError::invalid_reference(RecordKind::Permission, name))?;
            target.insert(id);
        }

        Ok(sync_edges(&mut self.role_permissions, role, target))
    }

    /// Replace the user's role set with the named roles.
    pub fn sync_user_roles<I>(&mut self, user: UserId, names: I) -> DomainResult<SyncOutcome<RoleId>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.user(user)?;

        let mut target = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            let id = self
                .role_by_name(name)
                .map(|r| r.id)
                .ok_or_else(|| DomainError::invalid_reference(RecordKind::Role, name))?;
            target.insert(id);
        }

        Ok(sync_edges(&mut self.user_roles, user, target))
    }

    pub fn detach_all_role_permissions(&mut self, role: RoleId) -> usize {
        let before = self.role_permissions.len();
        self.role_permissions.retain(|(r, _)| *r != role);
        before - self.role_permissions.len()
    }

    pub fn detach_all_user_roles(&mut self, user: UserId) -> usize {
        let before = self.user_roles.len();
        self.user_roles.retain(|(u, _)| *u != user);
        before - self.user_roles.len()
    }

    /// Unassign a role from every user holding it.
    pub fn detach_all_role_users(&mut self, role: RoleId) -> usize {
        let before = self.user_roles.len();
        self.user_roles.retain(|(_, r)| *r != role);
        before - self.user_roles.len()
    }

    pub fn detach_permission_from_roles(&mut self, permission: PermissionId) -> usize {
        let before = self.role_permissions.len();
        self.role_permissions.retain(|(_, p)| *p != permission);
        before - self.role_permissions.len()
    }

    /// Permissions granted by a role, ordered by name.
    pub fn permissions_of_role(&self, role: RoleId) -> Vec<&Permission> {
        let mut permissions: Vec<&Permission> = self
            .role_permissions
            .iter()
            .filter(|(r, _)| *r == role)
            .filter_map(|(_, p)| self.permissions.get(p))
            .collect();
        permissions.sort_by_key(|p| p.name);
        permissions
    }

    /// Roles held by a user, ordered by name.
    pub fn roles_of_user(&self, user: UserId) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user)
            .filter_map(|(_, r)| self.roles.get(r))
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    /// Flattened, de-duplicated permissions a user holds through their roles.
    pub fn effective_permissions(&self, user: UserId) -> BTreeSet<PermissionName> {
        let roles: BTreeSet<RoleId> = self
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, r)| *r)
            .collect();

        self.role_permissions
            .iter()
            .filter(|(r, _)| roles.contains(r))
            .filter_map(|(_, p)| self.permissions.get(p))
            .map(|p| p.name)
            .collect()
    }

    pub fn role_users_count(&self, role: RoleId) -> usize {
        self.user_roles.iter().filter(|(_, r)| *r == role).count()
    }

    pub fn role_permissions_count(&self, role: RoleId) -> usize {
        self.role_permissions.iter().filter(|(r, _)| *r == role).count()
    }

    pub fn user_roles_count(&self, user: UserId) -> usize {
        self.user_roles.iter().filter(|(u, _)| *u == user).count()
    }

    pub fn permission_roles_count(&self, permission: PermissionId) -> usize {
        self.role_permissions
            .iter()
            .filter(|(_, p)| *p == permission)
            .count()
    }
}
