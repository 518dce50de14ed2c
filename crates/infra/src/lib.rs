//! Infrastructure layer: assignment store, admin services, config, seeding
//! and password hashing.

pub mod admin;
pub mod bootstrap;
pub mod config;
pub mod password;
pub mod store;


pub use admin::{PermissionAdmin, RoleAdmin, UserAdmin};
pub use bootstrap::{SeedReport, seed};
pub use config::AuthConfig;
pub use password::Argon2Hasher;
pub use store::{AuthStore, AuthTables, InMemoryAuthStore, SyncOutcome};
