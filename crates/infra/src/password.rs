//! Argon2id password hashing.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};

use warden_auth::PasswordHasher;
use warden_core::{DomainError, DomainResult};

/// PHC-encoded Argon2id hashes with a random salt per password.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `password` against a hash produced by [`PasswordHasher::hash`].
    pub fn verify(&self, password: &str, encoded: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(encoded)
            .map_err(|e| DomainError::validation(format!("malformed password hash: {e}")))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::store(format!("password hashing failed: {e}")))
    }
}
