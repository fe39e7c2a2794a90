use std::sync::Arc;

use thiserror::Error;

use crate::config::{AppConfig, StorageMode};
use crate::db::{self, DbPool};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, OrderRepository, ProductRepository};

use super::seed::{self, SeedReport};
use super::{DieselCatalogRepository, DieselOrderRepository, InMemoryCatalog, InMemoryOrderRepository};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("DATABASE_URL must be set when STORAGE=postgres")]
    MissingDatabaseUrl,
    #[error("Failed to connect to database: {0}")]
    Connect(#[from] r2d2::Error),
    #[error("Failed to run database migrations: {0}")]
    Migrate(String),
    #[error("Failed to seed catalog: {0}")]
    Seed(#[from] DomainError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Postgres => "postgres",
            StorageKind::Memory => "memory",
        }
    }
}

/// Which backend is live and whether it can currently be reached.
#[derive(Clone)]
pub struct StorageStatus {
    kind: StorageKind,
    pool: Option<DbPool>,
}

impl StorageStatus {
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    pub fn is_connected(&self) -> bool {
        match &self.pool {
            Some(pool) => db::is_reachable(pool),
            None => true,
        }
    }
}

/// The repositories backing the services, all on the same backend.
#[derive(Clone)]
pub struct Stores {
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub status: StorageStatus,
}

impl Stores {
    pub fn in_memory() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        Self {
            products: catalog.clone(),
            categories: catalog,
            orders: Arc::new(InMemoryOrderRepository::new()),
            status: StorageStatus {
                kind: StorageKind::Memory,
                pool: None,
            },
        }
    }

    pub fn postgres(pool: DbPool) -> Self {
        let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
        Self {
            products: catalog.clone(),
            categories: catalog,
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            status: StorageStatus {
                kind: StorageKind::Postgres,
                pool: Some(pool),
            },
        }
    }

    fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = db::create_pool(database_url)?;
        crate::run_migrations(&pool)?;
        log::info!("Connected to Postgres");
        Ok(Self::postgres(pool))
    }

    /// Picks the backend once for the lifetime of the process and seeds it
    /// when configured to.
    pub fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let stores = match (config.storage, config.database_url.as_deref()) {
            (StorageMode::Memory, _) | (StorageMode::Auto, None) => Self::in_memory(),
            (StorageMode::Postgres, None) => return Err(StorageError::MissingDatabaseUrl),
            (StorageMode::Postgres, Some(url)) => Self::connect(url)?,
            (StorageMode::Auto, Some(url)) => match Self::connect(url) {
                Ok(stores) => stores,
                Err(e) => {
                    log::warn!("{}; falling back to in-memory storage", e);
                    Self::in_memory()
                }
            },
        };
        log::info!("Using {} storage", stores.status.kind().as_str());

        if config.seed_catalog {
            stores.seed_if_empty()?;
        }
        Ok(stores)
    }

    pub fn seed_if_empty(&self) -> Result<SeedReport, DomainError> {
        seed::seed_if_empty(self.products.as_ref(), self.categories.as_ref())
    }
}
