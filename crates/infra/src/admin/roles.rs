use chrono::Utc;
use tracing::instrument;

use warden_auth::{Role, RoleInput};
use warden_core::{DomainResult, RoleId};

use super::views::{self, RoleDetail, RoleEditView, RoleSummary};
use super::{guards, required};
use crate::store::AuthStore;

/// Role management actions.
pub struct RoleAdmin<S> {
    store: S,
}

impl<S> RoleAdmin<S>
where
    S: AuthStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All roles annotated with `permissions_count` and `users_count`.
    pub fn index(&self) -> DomainResult<Vec<RoleSummary>> {
        self.store
            .read(|t| t.roles().map(|r| views::role_summary(t, r)).collect())
    }

    pub fn edit(&self, id: RoleId) -> DomainResult<RoleEditView> {
        self.store.read(|t| -> DomainResult<RoleEditView> {
            Ok(RoleEditView {
                role: views::role_detail(t, id)?,
                permissions: t.permissions().cloned().collect(),
            })
        })?
    }

    #[instrument(skip(self, input), fields(role = %input.name), err)]
    pub fn create(&self, input: &RoleInput) -> DomainResult<RoleDetail> {
        let name = required("name", &input.name)?;
        let now = Utc::now();

        let (detail, outcome) = self.store.transaction(|t| {
            let role = Role::new(name, now);
            let id = role.id;
            t.insert_role(role)?;
            let outcome = t.sync_role_permissions(id, input.permissions.iter().flatten())?;
            Ok((views::role_detail(t, id)?, outcome))
        })?;

        tracing::info!(
            role_id = %detail.role.id,
            permissions = outcome.added.len(),
            "role created"
        );
        Ok(detail)
    }

    /// Rename the role and replace its permission set.
    #[instrument(skip(self, input), fields(role_id = %id), err)]
    pub fn update(&self, id: RoleId, input: &RoleInput) -> DomainResult<RoleDetail> {
        let name = required("name", &input.name)?;
        let now = Utc::now();

        let (detail, outcome) = self.store.transaction(|t| {
            guards::ensure_role_renamable(t.role(id)?, name)?;
            t.rename_role(id, name, now)?;
            let outcome = t.sync_role_permissions(id, input.permissions.iter().flatten())?;
            Ok((views::role_detail(t, id)?, outcome))
        })?;

        tracing::debug!(
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            "role permissions synced"
        );
        tracing::info!(role = %detail.role.name, "role updated");
        Ok(detail)
    }

    /// Unassign the role from every user holding it.
    #[instrument(skip(self), fields(role_id = %id), err)]
    pub fn revoke_from_all_users(&self, id: RoleId) -> DomainResult<usize> {
        let detached = self.store.transaction(|t| {
            t.role(id)?;
            Ok(t.detach_all_role_users(id))
        })?;
        tracing::info!(users = detached, "role revoked from all users");
        Ok(detached)
    }

    #[instrument(skip(self), fields(role_id = %id), err)]
    pub fn destroy(&self, id: RoleId) -> DomainResult<()> {
        let (role, detached) = self
            .store
            .transaction(|t| {
                let role = t.role(id)?.clone();
                guards::ensure_role_deletable(t, &role)?;
                let detached = t.detach_all_role_permissions(id);
                t.remove_role(id)?;
                Ok((role, detached))
            })
            .inspect_err(|e| tracing::warn!(error = %e, "role deletion rejected"))?;

        tracing::info!(role = %role.name, permissions_detached = detached, "role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_auth::{Permission, PermissionName, User};
    use warden_core::{DomainError, RecordKind};

    use super::*;
    use crate::store::{AuthStore, InMemoryAuthStore};

    fn setup() -> (Arc<InMemoryAuthStore>, RoleAdmin<Arc<InMemoryAuthStore>>) {
        let store = Arc::new(InMemoryAuthStore::new());
        store
            .transaction(|t| {
                for name in PermissionName::ALL {
                    t.insert_permission(Permission::new(name, Utc::now()))?;
                }
                Ok(())
            })
            .unwrap();
        (store.clone(), RoleAdmin::new(store))
    }

    fn input(name: &str, permissions: &[&str]) -> RoleInput {
        RoleInput {
            name: name.to_string(),
            permissions: Some(permissions.iter().map(|p| p.to_string()).collect()),
        }
    }

    #[test]
    fn editor_resync_keeps_only_new_set() {
        let (_, admin) = setup();
        let editor = admin
            .create(&input("editor", &["user.read", "user.update"]))
            .unwrap();
        assert_eq!(editor.permission_names(), vec!["user.read", "user.update"]);

        let editor = admin
            .update(editor.role.id, &input("editor", &["user.read"]))
            .unwrap();
        assert_eq!(editor.permission_names(), vec!["user.read"]);
    }

    #[test]
    fn create_with_unknown_permission_creates_nothing() {
        let (_, admin) = setup();
        let err = admin
            .create(&input("editor", &["user.read", "user.teleport"]))
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::invalid_reference(RecordKind::Permission, "user.teleport")
        );
        assert!(admin.index().unwrap().is_empty());
    }

    #[test]
    fn duplicate_role_name_is_rejected() {
        let (_, admin) = setup();
        admin.create(&input("editor", &[])).unwrap();
        let err = admin.create(&input("editor", &[])).unwrap_err();
        assert_eq!(err, DomainError::duplicate("name", "editor"));

        let writer = admin.create(&input("writer", &[])).unwrap();
        let err = admin
            .update(writer.role.id, &input("editor", &[]))
            .unwrap_err();
        assert_eq!(err, DomainError::duplicate("name", "editor"));
    }

    #[test]
    fn missing_permissions_clear_the_set() {
        let (_, admin) = setup();
        let role = admin.create(&input("editor", &["role.read"])).unwrap();
        let role = admin
            .update(
                role.role.id,
                &RoleInput {
                    name: "editor".to_string(),
                    permissions: None,
                },
            )
            .unwrap();
        assert!(role.permissions.is_empty());
    }

    #[test]
    fn admin_role_cannot_be_deleted_even_when_unused() {
        let (_, admin) = setup();
        let role = admin.create(&input("admin", &["user.delete"])).unwrap();

        let err = admin.destroy(role.role.id).unwrap_err();
        assert_eq!(err, DomainError::ProtectedRole("admin".to_string()));
        assert_eq!(admin.index().unwrap().len(), 1);
    }

    #[test]
    fn role_in_use_is_deletable_after_detaching_users() {
        let (store, admin) = setup();
        let role = admin.create(&input("editor", &["user.read"])).unwrap();
        store
            .transaction(|t| {
                let user = User::new("Ed", "ed@example.com", "h".to_string(), Utc::now());
                let id = user.id;
                t.insert_user(user)?;
                t.sync_user_roles(id, ["editor"])
            })
            .unwrap();

        let err = admin.destroy(role.role.id).unwrap_err();
        assert!(matches!(err, DomainError::RoleInUse { users: 1, .. }));

        assert_eq!(admin.revoke_from_all_users(role.role.id).unwrap(), 1);
        admin.destroy(role.role.id).unwrap();
        assert!(admin.index().unwrap().is_empty());
    }

    #[test]
    fn index_reports_counts() {
        let (_, admin) = setup();
        admin
            .create(&input("editor", &["user.read", "role.read"]))
            .unwrap();

        let index = admin.index().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].permissions_count, 2);
        assert_eq!(index[0].users_count, 0);

        let json = serde_json::to_value(&index[0]).unwrap();
        assert_eq!(json["name"], "editor");
        assert_eq!(json["guard_name"], "web");
        assert_eq!(json["permissions_count"], 2);
    }

    #[test]
    fn edit_lists_every_permission() {
        let (_, admin) = setup();
        let role = admin.create(&input("editor", &["user.read"])).unwrap();
        let view = admin.edit(role.role.id).unwrap();
        assert_eq!(view.permissions.len(), PermissionName::ALL.len());
        assert_eq!(view.role.permissions.len(), 1);

        let missing = admin.edit(RoleId::new()).unwrap_err();
        assert!(matches!(missing, DomainError::NotFound { kind: RecordKind::Role, .. }));
    }
}
