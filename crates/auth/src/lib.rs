//! `warden-auth`: identifiers, records and the capability evaluator of the
//! authorization model.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod evaluator;
pub mod permissions;
pub mod policy;
pub mod registry;
pub mod roles;
pub mod snapshot;
pub mod user;

pub use evaluator::{AuthzError, CanRequest, Capabilities, OneOrMany};
pub use permissions::{Permission, PermissionInput};
pub use policy::{Navigation, PermissionSummary, Policy, UserAction};
pub use registry::{GUARD_NAME, PermissionName, SystemRole, UnknownIdentifier};
pub use roles::{Role, RoleInput};
pub use snapshot::{AuthSnapshot, RoleRef, SnapshotUser};
pub use user::{PasswordHasher, User, UserInput, normalize_email};
