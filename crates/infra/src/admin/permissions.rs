use chrono::Utc;
use tracing::instrument;

use warden_auth::{Permission, PermissionInput, PermissionName};
use warden_core::{DomainError, DomainResult, PermissionId};

use super::required;
use super::views::{self, PermissionListing};
use crate::store::AuthStore;

fn parse_name(input: &PermissionInput) -> DomainResult<PermissionName> {
    required("name", &input.name)?
        .parse()
        .map_err(|e: warden_auth::UnknownIdentifier| DomainError::validation(e.to_string()))
}

/// Permission management actions.
///
/// Only registry identifiers can be stored; creating a permission outside the
/// registry is a code change.
pub struct PermissionAdmin<S> {
    store: S,
}

impl<S> PermissionAdmin<S>
where
    S: AuthStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn index(&self) -> DomainResult<Vec<PermissionListing>> {
        self.store.read(|t| -> DomainResult<Vec<PermissionListing>> {
            t.permissions()
                .map(|p| views::permission_listing(t, p.id))
                .collect()
        })?
    }

    #[instrument(skip(self, input), fields(permission = %input.name), err)]
    pub fn create(&self, input: &PermissionInput) -> DomainResult<Permission> {
        let name = parse_name(input)?;
        let permission = Permission::new(name, Utc::now());

        self.store
            .transaction(|t| t.insert_permission(permission.clone()))?;

        tracing::info!(permission_id = %permission.id, "permission created");
        Ok(permission)
    }

    #[instrument(skip(self, input), fields(permission_id = %id), err)]
    pub fn update(&self, id: PermissionId, input: &PermissionInput) -> DomainResult<Permission> {
        let name = parse_name(input)?;
        let now = Utc::now();

        let permission = self
            .store
            .transaction(|t| t.rename_permission(id, name, now).cloned())?;

        tracing::info!(permission = %permission.name, "permission updated");
        Ok(permission)
    }

    /// Delete a permission after detaching it from every role.
    #[instrument(skip(self), fields(permission_id = %id), err)]
    pub fn destroy(&self, id: PermissionId) -> DomainResult<()> {
        let (permission, detached) = self.store.transaction(|t| {
            t.permission(id)?;
            let detached = t.detach_permission_from_roles(id);
            let permission = t.remove_permission(id)?;
            Ok((permission, detached))
        })?;

        tracing::info!(
            permission = %permission.name,
            roles_detached = detached,
            "permission deleted"
        );
        Ok(())
    }
}
