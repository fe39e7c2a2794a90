//! Process-local stores used when no Postgres database is configured or
//! reachable. Every collection sits behind its own mutex and every
//! read-modify-write happens under a single lock acquisition.

mod catalog;
mod orders;

use std::sync::{Mutex, MutexGuard};

use crate::domain::errors::DomainError;

pub use catalog::InMemoryCatalog;
pub use orders::InMemoryOrderRepository;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}
