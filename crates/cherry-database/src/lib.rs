//! # cherry-database
//!
//! The credential and announcement stores. [`store`] defines the
//! storage-independent traits; [`repositories`] implements them on
//! PostgreSQL and [`memory`] implements them in process memory.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use cherry_core::config::{DatabaseConfig, DatabaseProvider};
use cherry_core::result::AppResult;

pub use connection::DatabasePool;
pub use store::{AnnouncementStore, ResetOutcome, UserStore};

/// The stores selected by `database.provider`.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// Announcement store.
    pub announcements: Arc<dyn AnnouncementStore>,
    /// The pool, when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Connect (and migrate) according to configuration.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Memory => {
                info!("Using in-memory stores; data will not survive a restart");
                Ok(Self::memory())
            }
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self {
                    users: Arc::new(repositories::UserRepository::new(pool.pool().clone())),
                    announcements: Arc::new(repositories::AnnouncementRepository::new(
                        pool.pool().clone(),
                    )),
                    pool: Some(pool),
                })
            }
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserStore::new()),
            announcements: Arc::new(memory::MemoryAnnouncementStore::new()),
            pool: None,
        }
    }

    /// Release database connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
