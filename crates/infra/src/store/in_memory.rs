use std::sync::RwLock;

use warden_core::{DomainError, DomainResult};

use super::r#trait::AuthStore;
use super::tables::AuthTables;

/// In-memory authorization store.
///
/// Intended for tests/dev and for embedding. Transactions clone the tables,
/// so cost grows with the data set.
#[derive(Debug, Default)]
pub struct InMemoryAuthStore {
    tables: RwLock<AuthTables>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStore for InMemoryAuthStore {
    fn read<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&AuthTables) -> T,
    {
        let tables = self
            .tables
            .read()
            .map_err(|_| DomainError::store("lock poisoned"))?;
        Ok(f(&*tables))
    }

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut AuthTables) -> DomainResult<T>,
    {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| DomainError::store("lock poisoned"))?;

        let mut working = tables.clone();
        let value = f(&mut working)?;
        *tables = working;
        Ok(value)
    }
}
