//! Paste storage operations.

use super::{backend::Backend, connection::ConnectionManager};
use crate::{
    error::AppError,
    models::paste::{parse_paste_id, Paste},
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// The only component that issues storage operations for paste rows.
///
/// Every call is bounded by the configured storage timeout. There is no retry
/// at this layer.
#[derive(Clone)]
pub struct PasteStore {
    connections: Arc<ConnectionManager>,
    timeout: Duration,
}

impl PasteStore {
    pub fn new(connections: Arc<ConnectionManager>, timeout: Duration) -> Self {
        Self {
            connections,
            timeout,
        }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.connections
    }

    async fn bounded<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T, AppError>
    where
        F: FnOnce(Backend) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let backend = self.connections.backend()?;
        match tokio::time::timeout(self.timeout, f(backend)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "paste {} exceeded {:?}",
                op, self.timeout
            ))),
        }
    }

    /// Insert a new paste.
    ///
    /// # Errors
    /// Storage failures (including an id collision) are returned as-is.
    pub async fn create(&self, paste: &Paste) -> Result<(), AppError> {
        let result = self
            .bounded("create", |backend| async move { backend.insert(paste).await })
            .await;
        if let Err(ref err) = result {
            tracing::error!("Failed to create paste {}: {}", paste.id, err);
        }
        result
    }

    /// Fetch by client-supplied id.
    ///
    /// # Errors
    /// `InvalidId` for malformed ids (storage is not consulted), `NotFound`
    /// when no row exists.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Paste, AppError> {
        let id = parse_paste_id(id)?;
        self.fetch(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        self.bounded("fetch", |backend| async move { backend.get(id).await })
            .await
    }

    /// Delete by client-supplied id.
    ///
    /// # Errors
    /// `InvalidId` for malformed ids, `NotFound` when nothing was deleted.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        let id = parse_paste_id(id)?;
        let deleted = self
            .bounded("delete", |backend| async move { backend.delete(id).await })
            .await?;
        if deleted {
            tracing::debug!("Deleted paste {}", id);
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Atomically delete a paste and return the removed row.
    ///
    /// # Returns
    /// `None` when the row was already gone, e.g. a concurrent reader took it.
    pub async fn take(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        self.bounded("take", |backend| async move {
            backend.delete_and_return(id).await
        })
        .await
    }

    /// Delete rows whose expiry is before `now`.
    ///
    /// # Returns
    /// Number of rows removed.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.bounded("purge", |backend| async move {
            backend.purge_expired(now).await
        })
        .await
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.bounded("count", |backend| async move { backend.count().await })
            .await
    }
}
