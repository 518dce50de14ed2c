//! `warden-core`: identifiers and the domain error model shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, RecordKind};
pub use id::{PermissionId, RoleId, UserId};
