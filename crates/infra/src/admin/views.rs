//! Read models handed to the presentation layer.

use serde::Serialize;

use warden_auth::{Permission, Role, User};
use warden_core::{DomainResult, PermissionId, RoleId, UserId};

use crate::store::AuthTables;

/// Role row for the roles index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    #[serde(flatten)]
    pub role: Role,
    pub permissions_count: usize,
    pub users_count: usize,
}

/// Role with its permissions loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

impl RoleDetail {
    pub fn permission_names(&self) -> Vec<&'static str> {
        self.permissions.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Role edit page: the role plus every permission that can be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleEditView {
    pub role: RoleDetail,
    pub permissions: Vec<Permission>,
}

/// User row for the users index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    pub roles_count: usize,
    pub roles: Vec<Role>,
}

/// User with its roles loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub roles: Vec<Role>,
}

impl UserDetail {
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

/// User create/edit page: the user (on edit) plus every assignable role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFormView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDetail>,
    pub roles: Vec<Role>,
}

/// Permission row for the permissions index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionListing {
    #[serde(flatten)]
    pub permission: Permission,
    pub roles_count: usize,
}

pub(crate) fn role_summary(tables: &AuthTables, role: &Role) -> RoleSummary {
    RoleSummary {
        role: role.clone(),
        permissions_count: tables.role_permissions_count(role.id),
        users_count: tables.role_users_count(role.id),
    }
}

pub(crate) fn role_detail(tables: &AuthTables, id: RoleId) -> DomainResult<RoleDetail> {
    let role = tables.role(id)?.clone();
    let permissions = tables.permissions_of_role(id).into_iter().cloned().collect();
    Ok(RoleDetail { role, permissions })
}

pub(crate) fn user_summary(tables: &AuthTables, user: &User) -> UserSummary {
    UserSummary {
        user: user.clone(),
        roles_count: tables.user_roles_count(user.id),
        roles: tables.roles_of_user(user.id).into_iter().cloned().collect(),
    }
}

pub(crate) fn user_detail(tables: &AuthTables, id: UserId) -> DomainResult<UserDetail> {
    let user = tables.user(id)?.clone();
    let roles = tables.roles_of_user(id).into_iter().cloned().collect();
    Ok(UserDetail { user, roles })
}

pub(crate) fn permission_listing(
    tables: &AuthTables,
    id: PermissionId,
) -> DomainResult<PermissionListing> {
    Ok(PermissionListing {
        permission: tables.permission(id)?.clone(),
        roles_count: tables.permission_roles_count(id),
    })
}
