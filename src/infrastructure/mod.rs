pub mod catalog_repo;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod seed;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use catalog_repo::DieselCatalogRepository;
pub use memory::{InMemoryCatalog, InMemoryOrderRepository};
pub use order_repo::DieselOrderRepository;
pub use storage::{StorageKind, StorageStatus, Stores};

// ── Error conversions (infrastructure concern only) ──────────────────────────

/// Client-facing text for unique violations. The database message names
/// constraints and values and stays in the debug log.
pub const DUPLICATE_KEY: &str = "A record with the same key already exists";

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                log::debug!("Unique violation: {}", info.message());
                DomainError::Conflict(DUPLICATE_KEY.to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}
