//! Administrative boundary: role, user and permission management.
//!
//! Every mutating action runs as one [`AuthStore`](crate::store::AuthStore)
//! transaction and applies the guard rules before committing, so a rejected
//! action never leaves partial edge state behind.

pub mod guards;
pub mod permissions;
pub mod roles;
pub mod users;
pub mod views;

pub use permissions::PermissionAdmin;
pub use roles::RoleAdmin;
pub use users::UserAdmin;
pub use views::{
    PermissionListing, RoleDetail, RoleEditView, RoleSummary, UserDetail, UserFormView,
    UserSummary,
};

use warden_core::{DomainError, DomainResult};

/// Trimmed value of a required text field.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> DomainResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(value)
}
