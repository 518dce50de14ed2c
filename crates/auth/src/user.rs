//! User accounts as seen by the authorization model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{DomainResult, UserId};

/// Stored user record.
///
/// Role assignments live in the assignment store, not on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into().trim().to_string(),
            email: normalize_email(email),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Emails are compared case-insensitively and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Input for creating or updating a user.
///
/// `password` is required on create and optional on update (an absent or empty
/// password keeps the current hash). `roles` replaces the whole role set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl UserInput {
    /// The password to apply, if one was actually provided.
    pub fn filled_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// One-way password transform used when creating or updating accounts.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<String>;
}

impl<H> PasswordHasher for std::sync::Arc<H>
where
    H: PasswordHasher + ?Sized,
{
    fn hash(&self, password: &str) -> DomainResult<String> {
        (**self).hash(password)
    }
}
