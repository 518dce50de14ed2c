//! Business-rule predicates derived from the primitive capability checks.

use serde::Serialize;

use warden_core::UserId;

use crate::evaluator::Capabilities;
use crate::registry::{PermissionName, SystemRole};

const USER_MANAGEMENT: [PermissionName; 3] = [
    PermissionName::UserCreate,
    PermissionName::UserUpdate,
    PermissionName::UserDelete,
];

const ROLE_MANAGEMENT: [PermissionName; 6] = [
    PermissionName::RoleCreate,
    PermissionName::RoleUpdate,
    PermissionName::RoleDelete,
    PermissionName::PermissionCreate,
    PermissionName::PermissionUpdate,
    PermissionName::PermissionDelete,
];

const SENSITIVE_READS: [PermissionName; 3] = [
    PermissionName::UserRead,
    PermissionName::RoleRead,
    PermissionName::PermissionRead,
];

/// Action offered on a user row, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserAction {
    Edit,
    Delete,
    AssignRoles,
    ViewDetails,
}

/// Which admin sections the current user may open.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub can_view_admin_panel: bool,
    pub can_view_users: bool,
    pub can_view_roles: bool,
    pub can_view_permissions: bool,
}

/// Debug view of every derived capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionSummary {
    pub user_roles: Vec<String>,
    pub can_manage_users: bool,
    pub can_manage_roles: bool,
    pub has_admin_access: bool,
    pub can_assign_roles: bool,
    pub can_view_sensitive_data: bool,
    pub navigation: Navigation,
}

#[derive(Debug, Copy, Clone)]
pub struct Policy<'a> {
    caps: Capabilities<'a>,
}

impl<'a> Policy<'a> {
    pub fn new(caps: Capabilities<'a>) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> Capabilities<'a> {
        self.caps
    }

    fn is_self(&self, target: UserId) -> bool {
        self.caps.user().is_some_and(|u| u.id == target)
    }

    fn is_admin(&self) -> bool {
        self.caps.has_role(SystemRole::Admin)
    }

    pub fn can_manage_users(&self) -> bool {
        self.caps.has_any_permission(USER_MANAGEMENT)
    }

    pub fn can_manage_roles(&self) -> bool {
        self.caps.has_any_permission(ROLE_MANAGEMENT)
    }

    pub fn has_admin_access(&self) -> bool {
        self.is_admin() || self.can_manage_users() || self.can_manage_roles()
    }

    /// Users can always edit themselves; admins holding `user.update` can edit anyone.
    pub fn can_edit_user(&self, target: UserId) -> bool {
        self.is_self(target)
            || (self.caps.has_permission(PermissionName::UserUpdate) && self.is_admin())
    }

    /// Nobody deletes themselves; otherwise admin role plus `user.delete`.
    pub fn can_delete_user(&self, target: UserId) -> bool {
        !self.is_self(target)
            && self.caps.has_permission(PermissionName::UserDelete)
            && self.is_admin()
    }

    pub fn can_assign_roles(&self) -> bool {
        self.is_admin()
            && self
                .caps
                .has_any_permission([PermissionName::RoleCreate, PermissionName::RoleUpdate])
    }

    pub fn can_view_sensitive_data(&self) -> bool {
        self.is_admin() || self.caps.has_any_permission(SENSITIVE_READS)
    }

    pub fn navigation(&self) -> Navigation {
        let admin = self.is_admin();
        Navigation {
            can_view_admin_panel: self.has_admin_access(),
            can_view_users: self.caps.has_permission(PermissionName::UserRead) || admin,
            can_view_roles: self.caps.has_permission(PermissionName::RoleRead) || admin,
            can_view_permissions: self.caps.has_permission(PermissionName::PermissionRead)
                || admin,
        }
    }

    pub fn user_actions(&self, target: UserId) -> Vec<UserAction> {
        let mut actions = Vec::new();
        if self.can_edit_user(target) {
            actions.push(UserAction::Edit);
        }
        if self.can_delete_user(target) {
            actions.push(UserAction::Delete);
        }
        if self.can_assign_roles() {
            actions.push(UserAction::AssignRoles);
        }
        if self.can_view_sensitive_data() {
            actions.push(UserAction::ViewDetails);
        }
        actions
    }

    pub fn permission_summary(&self) -> PermissionSummary {
        PermissionSummary {
            user_roles: self.caps.roles().map(str::to_string).collect(),
            can_manage_users: self.can_manage_users(),
            can_manage_roles: self.can_manage_roles(),
            has_admin_access: self.has_admin_access(),
            can_assign_roles: self.can_assign_roles(),
            can_view_sensitive_data: self.can_view_sensitive_data(),
            navigation: self.navigation(),
        }
    }
}

impl<'a> From<Capabilities<'a>> for Policy<'a> {
    fn from(caps: Capabilities<'a>) -> Self {
        Self::new(caps)
    }
}
