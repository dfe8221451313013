//! Storage handle dispatching to the embedded or networked store.

use super::{embedded::EmbeddedStore, networked::NetworkedStore};
use crate::{error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A live storage handle. Cloning is cheap and shares the underlying store.
#[derive(Debug, Clone)]
pub enum Backend {
    Embedded(EmbeddedStore),
    Networked(NetworkedStore),
}

/// Run a blocking embedded-store call on the blocking pool.
async fn blocking<T, F>(store: &EmbeddedStore, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&EmbeddedStore) -> Result<T, AppError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store)).await?
}

impl Backend {
    /// Short mode label for logs.
    pub fn mode(&self) -> &'static str {
        match self {
            Backend::Embedded(_) => "embedded",
            Backend::Networked(_) => "networked",
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            Backend::Embedded(store) => blocking(store, |store| store.ping()).await,
            Backend::Networked(store) => store.ping().await,
        }
    }

    /// Create the paste table if needed. Embedded stores do this on open.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        match self {
            Backend::Embedded(_) => Ok(()),
            Backend::Networked(store) => store.ensure_schema().await,
        }
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        match self {
            Backend::Embedded(store) => blocking(store, |store| store.count()).await,
            Backend::Networked(store) => store.count().await,
        }
    }

    pub async fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        match self {
            Backend::Embedded(store) => {
                let key = paste.id.to_string();
                let encoded = bincode::serialize(paste)?;
                blocking(store, move |store| store.insert(&key, &encoded)).await
            }
            Backend::Networked(store) => store.insert(paste).await,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        match self {
            Backend::Embedded(store) => blocking(store, move |store| store.get(id)).await,
            Backend::Networked(store) => store.get(id).await,
        }
    }

    /// Delete by id.
    ///
    /// # Returns
    /// `true` when a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        match self {
            Backend::Embedded(store) => {
                blocking(store, move |store| Ok(store.delete_and_return(id)?.is_some())).await
            }
            Backend::Networked(store) => store.delete(id).await,
        }
    }

    /// Delete by id and hand back the removed row, atomically.
    pub async fn delete_and_return(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        match self {
            Backend::Embedded(store) => {
                blocking(store, move |store| store.delete_and_return(id)).await
            }
            Backend::Networked(store) => store.delete_and_return(id).await,
        }
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        match self {
            Backend::Embedded(store) => {
                blocking(store, move |store| store.purge_expired(now)).await
            }
            Backend::Networked(store) => store.purge_expired(now).await,
        }
    }

    /// Release the handle.
    ///
    /// The redb file closes once the last clone drops; the sqlx pool waits for
    /// checked-out connections to return.
    pub async fn close(self) -> Result<(), AppError> {
        match self {
            Backend::Embedded(store) => {
                tokio::task::spawn_blocking(move || drop(store)).await?;
                Ok(())
            }
            Backend::Networked(store) => {
                store.close().await;
                Ok(())
            }
        }
    }
}
