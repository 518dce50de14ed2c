//! Seeds a store with the registry permissions, the system roles and an
//! optional admin account.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use warden_auth::{Permission, PasswordHasher, PermissionName, Role, SystemRole, User};
use warden_core::DomainResult;

use crate::config::AuthConfig;
use crate::store::AuthStore;

/// What a seeding run actually created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub permissions_created: usize,
    pub roles_created: Vec<String>,
    pub admin_created: bool,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        self.permissions_created == 0 && self.roles_created.is_empty() && !self.admin_created
    }
}

/// Seed everything in one transaction.
///
/// Records that already exist are left as they are, including the permission
/// sets of existing roles, so running this again changes nothing.
#[instrument(skip_all, err)]
pub fn seed<S, H>(store: &S, config: &AuthConfig, hasher: &H) -> DomainResult<SeedReport>
where
    S: AuthStore,
    H: PasswordHasher,
{
    let now = Utc::now();
    let admin_hash = config
        .admin_user
        .as_ref()
        .map(|admin| hasher.hash(&admin.password))
        .transpose()?;

    let role_names: BTreeSet<&str> = SystemRole::ALL
        .iter()
        .map(|role| -> &str { role.as_str() })
        .chain(config.default_permissions.keys().map(String::as_str))
        .collect();

    let report = store.transaction(|t| {
        let mut report = SeedReport::default();

        for name in PermissionName::ALL {
            if t.permission_by_name(name).is_none() {
                t.insert_permission(Permission::new(name, now))?;
                report.permissions_created += 1;
            }
        }

        for name in role_names {
            if t.role_by_name(name).is_some() {
                continue;
            }
            let role = Role::new(name, now);
            let id = role.id;
            t.insert_role(role)?;
            t.sync_role_permissions(id, config.permissions_for(name))?;
            report.roles_created.push(name.to_string());
        }

        if let (Some(admin), Some(hash)) = (&config.admin_user, admin_hash) {
            if t.user_by_email(&admin.email).is_none() {
                let user = User::new(admin.name.as_str(), &admin.email, hash, now);
                let id = user.id;
                t.insert_user(user)?;
                t.sync_user_roles(id, [SystemRole::Admin])?;
                report.admin_created = true;
            }
        }

        Ok(report)
    })?;

    if report.is_noop() {
        tracing::debug!("store already seeded");
    } else {
        tracing::info!(
            permissions = report.permissions_created,
            roles = ?report.roles_created,
            admin = report.admin_created,
            "authorization store seeded"
        );
    }
    Ok(report)
}
