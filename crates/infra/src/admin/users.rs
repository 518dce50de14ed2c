use chrono::Utc;
use tracing::instrument;

use warden_auth::{
    AuthSnapshot, PasswordHasher, RoleRef, SnapshotUser, User, UserInput, normalize_email,
};
use warden_core::{DomainError, DomainResult, UserId};

use super::views::{self, UserDetail, UserFormView, UserSummary};
use super::{guards, required};
use crate::store::AuthStore;

/// User management actions.
pub struct UserAdmin<S, H> {
    store: S,
    hasher: H,
}

impl<S, H> UserAdmin<S, H>
where
    S: AuthStore,
    H: PasswordHasher,
{
    pub fn new(store: S, hasher: H) -> Self {
        Self { store, hasher }
    }

    /// All users with their roles and `roles_count`.
    pub fn index(&self) -> DomainResult<Vec<UserSummary>> {
        self.store
            .read(|t| t.users().map(|u| views::user_summary(t, u)).collect())
    }

    pub fn create_form(&self) -> DomainResult<UserFormView> {
        self.store.read(|t| UserFormView {
            user: None,
            roles: t.roles().cloned().collect(),
        })
    }

    pub fn edit(&self, id: UserId) -> DomainResult<UserFormView> {
        self.store.read(|t| -> DomainResult<UserFormView> {
            Ok(UserFormView {
                user: Some(views::user_detail(t, id)?),
                roles: t.roles().cloned().collect(),
            })
        })?
    }

    #[instrument(skip(self, input), fields(email = %input.email), err)]
    pub fn create(&self, input: &UserInput) -> DomainResult<UserDetail> {
        let name = required("name", &input.name)?;
        let email = required("email", &input.email)?;
        let password = input
            .filled_password()
            .ok_or_else(|| DomainError::validation("password is required"))?;
        let password_hash = self.hasher.hash(password)?;
        let now = Utc::now();

        let detail = self.store.transaction(|t| {
            let user = User::new(name, email, password_hash, now);
            let id = user.id;
            t.insert_user(user)?;
            t.sync_user_roles(id, input.roles.iter().flatten())?;
            views::user_detail(t, id)
        })?;

        tracing::info!(user_id = %detail.user.id, roles = detail.roles.len(), "user created");
        Ok(detail)
    }

    /// Update profile fields, optionally the password, and replace the role set.
    #[instrument(skip(self, input), fields(user_id = %id), err)]
    pub fn update(&self, id: UserId, input: &UserInput) -> DomainResult<UserDetail> {
        let name = required("name", &input.name)?;
        let email = required("email", &input.email)?;
        let password_hash = input
            .filled_password()
            .map(|p| self.hasher.hash(p))
            .transpose()?;
        let now = Utc::now();

        let (detail, outcome) = self.store.transaction(|t| {
            t.ensure_email_available(email, Some(id))?;
            let user = t.user_mut(id)?;
            user.name = name.to_string();
            user.email = normalize_email(email);
            if let Some(hash) = password_hash {
                user.password_hash = hash;
            }
            user.updated_at = now;

            let outcome = t.sync_user_roles(id, input.roles.iter().flatten())?;
            Ok((views::user_detail(t, id)?, outcome))
        })?;

        tracing::debug!(
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            "user roles synced"
        );
        tracing::info!("user updated");
        Ok(detail)
    }

    /// Delete `id` on behalf of `actor`; nobody deletes their own account here.
    #[instrument(skip(self), fields(actor = %actor, user_id = %id), err)]
    pub fn destroy(&self, actor: UserId, id: UserId) -> DomainResult<()> {
        let detached = self
            .store
            .transaction(|t| {
                t.user(id)?;
                guards::ensure_not_self(actor, id)?;
                let detached = t.detach_all_user_roles(id);
                t.remove_user(id)?;
                Ok(detached)
            })
            .inspect_err(|e| tracing::warn!(error = %e, "user deletion rejected"))?;

        tracing::info!(roles_detached = detached, "user deleted");
        Ok(())
    }

    /// Authorization snapshot for a stored user, permissions flattened from roles
    /// and sorted by name.
    pub fn snapshot_for(&self, id: UserId) -> DomainResult<AuthSnapshot> {
        self.store.read(|t| -> DomainResult<AuthSnapshot> {
            let user = t.user(id)?;
            Ok(AuthSnapshot {
                user: Some(SnapshotUser {
                    id,
                    name: Some(user.name.clone()),
                    email: Some(user.email.clone()),
                    roles: t
                        .roles_of_user(id)
                        .into_iter()
                        .map(|r| RoleRef::new(r.name.as_str()))
                        .collect(),
                }),
                permissions: {
                    let mut names: Vec<String> = t
                        .effective_permissions(id)
                        .into_iter()
                        .map(|p| p.as_str().to_string())
                        .collect();
                    names.sort();
                    names
                },
            })
        })?
    }
}
