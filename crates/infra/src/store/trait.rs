use std::sync::Arc;

use warden_core::DomainResult;

use super::tables::AuthTables;

/// Transactional access to the authorization tables.
///
/// ## Transaction Semantics
///
/// `transaction()` runs the closure against a working copy of the tables and
/// commits it only when the closure returns `Ok`. Any error leaves the stored
/// state exactly as it was, so a multi-edge sync never applies partially.
/// Writers are serialized: two admin actions on the same role or user never
/// interleave their edge writes.
///
/// `read()` gives a consistent view for index/edit pages and snapshots.
pub trait AuthStore: Send + Sync {
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&AuthTables) -> T;

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut AuthTables) -> DomainResult<T>;
}

impl<S> AuthStore for Arc<S>
where
    S: AuthStore,
{
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&AuthTables) -> T,
    {
        (**self).read(f)
    }

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut AuthTables) -> DomainResult<T>,
    {
        (**self).transaction(f)
    }
}
