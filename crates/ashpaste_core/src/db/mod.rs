//! Storage layer: connection management and paste persistence.

/// Storage handle dispatch.
pub mod backend;
/// Connection establishment, health checks and shutdown.
pub mod connection;
/// redb-backed embedded store.
pub mod embedded;
/// sqlx/PostgreSQL-backed networked store.
pub mod networked;
/// Paste storage operations.
pub mod paste;
pub mod tables;

pub use backend::Backend;
pub use connection::{
    ConnectionManager, Connector, PoolSettings, RetryPolicy, StorageTarget, StoreConnector,
};
pub use paste::PasteStore;

use crate::{config::Config, constants::DEFAULT_STORAGE_TIMEOUT, error::AppError};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Storage handle plus the paste accessor built on top of it.
#[derive(Clone)]
pub struct Database {
    pub connections: Arc<ConnectionManager>,
    pub pastes: PasteStore,
}

impl Database {
    /// Connect to the configured target, retrying per `config.connect_attempts`.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for contradictory pool limits and
    /// [`AppError::Connection`] once every attempt failed.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let connector = StoreConnector::new(config.storage_target(), config.pool)?;
        let connections = Arc::new(ConnectionManager::new());
        connections
            .connect(&connector, &config.retry_policy())
            .await?;
        Ok(Self::from_manager(connections, config.storage_timeout))
    }

    /// Open an embedded store in `dir` with a single attempt.
    ///
    /// # Errors
    /// Returns an error if the redb file cannot be opened.
    pub async fn open_embedded(dir: &Path) -> Result<Self, AppError> {
        let connector = StoreConnector::new(
            StorageTarget::Embedded {
                dir: dir.to_path_buf(),
            },
            PoolSettings::default(),
        )?;
        let connections = Arc::new(ConnectionManager::new());
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        connections.connect(&connector, &policy).await?;
        Ok(Self::from_manager(connections, DEFAULT_STORAGE_TIMEOUT))
    }

    /// Build from an existing manager, e.g. one shared with another subsystem.
    pub fn from_manager(connections: Arc<ConnectionManager>, storage_timeout: Duration) -> Self {
        Self {
            pastes: PasteStore::new(connections.clone(), storage_timeout),
            connections,
        }
    }

    /// Close the shared handle. See [`ConnectionManager::close`].
    pub async fn close(&self) -> Result<(), AppError> {
        self.connections.close().await
    }
}
