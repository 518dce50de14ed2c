//! Assignment store: user↔role and role↔permission relations.
//!
//! This module defines the transactional boundary the admin services mutate
//! through, plus the in-memory implementation.

pub mod in_memory;
pub mod tables;
pub mod r#trait;

pub use in_memory::InMemoryAuthStore;
pub use tables::{AuthTables, SyncOutcome};
pub use r#trait::AuthStore;
