//! Embedded single-file store backed by redb.
//!
//! All methods are blocking; [`super::Backend`] moves them onto the blocking
//! pool.

use super::tables::PASTES;
use crate::{constants::REDB_FILE_NAME, error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Handle to the embedded paste file. Clones share one redb instance.
#[derive(Clone)]
pub struct EmbeddedStore {
    db: Arc<redb::Database>,
    path: PathBuf,
}

impl std::fmt::Debug for EmbeddedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedStore")
            .field("path", &self.path)
            .finish()
    }
}

impl EmbeddedStore {
    /// Open (or create) the store inside `dir` and make sure the paste table
    /// exists.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created, the file is
    /// already open, or table initialization fails.
    pub fn open(dir: &Path) -> Result<Self, AppError> {
        let store = Self::open_file(dir)?;
        store.ensure_schema()?;
        Ok(store)
    }

    pub(crate) fn open_file(dir: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create data directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let path = dir.join(REDB_FILE_NAME);
        let db = redb::Database::create(&path)?;
        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub(crate) fn ensure_schema(&self) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.commit()?;
        Ok(())
    }

    /// Transport-level liveness: a read transaction can be started.
    pub fn ping(&self) -> Result<(), AppError> {
        let read_txn = self.db.begin_read()?;
        drop(read_txn);
        Ok(())
    }

    /// Number of stored pastes. Fails when the table is missing.
    pub fn count(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    /// Insert an encoded paste row. Never overwrites an existing id.
    pub fn insert(&self, id: &str, encoded: &[u8]) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            if pastes.get(id)?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Paste id '{}' already exists",
                    id
                )));
            }
            pastes.insert(id, encoded)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        let key = id.to_string();
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(key.as_str())? {
            Some(value) => Ok(Some(bincode::deserialize(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a paste and return the removed row, in one write transaction.
    ///
    /// Concurrent callers for the same id are serialized by redb's single
    /// writer; exactly one of them observes `Some`.
    pub fn delete_and_return(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        let key = id.to_string();
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let removed = pastes.remove(key.as_str())?;
            match removed {
                Some(guard) => Some(bincode::deserialize::<Paste>(guard.value())?),
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    /// Delete every row whose expiry instant is before `now`.
    ///
    /// # Returns
    /// Number of rows removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut expired = Vec::new();
            for item in pastes.iter()? {
                let (key, value) = item?;
                match bincode::deserialize::<Paste>(value.value()) {
                    Ok(paste) if paste.is_expired_at(now) => expired.push(key.value().to_string()),
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!("Skipping undecodable paste row '{}': {}", key.value(), err);
                    }
                }
            }
            for key in &expired {
                pastes.remove(key.as_str())?;
            }
            expired.len() as u64
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
