//! Networked PostgreSQL store backed by a sqlx pool.

use super::connection::PoolSettings;
use crate::{error::AppError, models::paste::Paste};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Connection;
use uuid::Uuid;

const CREATE_PASTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS pastes (
    id UUID PRIMARY KEY,
    content TEXT NOT NULL,
    language TEXT NOT NULL DEFAULT '',
    burn BOOLEAN NOT NULL DEFAULT FALSE,
    expires_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_EXPIRY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS pastes_expires_at_idx ON pastes (expires_at)";

const PASTE_COLUMNS: &str = "id, content, language, burn, expires_at, created_at, updated_at";

/// Translate pool settings into sqlx pool options.
///
/// sqlx has no separate idle-connection cap: `max_idle` becomes the warm
/// floor (`min_connections`), and idle connections above it are reaped after
/// `max_idle_time`.
pub fn configure_pool(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_open)
        .min_connections(settings.max_idle.min(settings.max_open))
        .max_lifetime(Some(settings.max_lifetime))
        .idle_timeout(Some(settings.max_idle_time))
        .test_before_acquire(true)
}

/// Pooled handle to the networked store.
#[derive(Debug, Clone)]
pub struct NetworkedStore {
    pool: PgPool,
}

impl NetworkedStore {
    /// Build a lazily-connecting pool; nothing touches the network until the
    /// first probe.
    ///
    /// # Errors
    /// Returns an error when the connection string cannot be parsed.
    pub fn open_lazy(url: &str, settings: &PoolSettings) -> Result<Self, AppError> {
        let pool = configure_pool(settings).connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_PASTES_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_EXPIRY_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pastes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    pub async fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO pastes (id, content, language, burn, expires_at, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(paste.id)
        .bind(&paste.content)
        .bind(&paste.language)
        .bind(paste.burn)
        .bind(paste.expires_at)
        .bind(paste.created_at)
        .bind(paste.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        let query = format!("SELECT {} FROM pastes WHERE id = $1", PASTE_COLUMNS);
        let paste = sqlx::query_as::<_, Paste>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(paste)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pastes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomic take: at most one concurrent caller receives the row.
    pub async fn delete_and_return(&self, id: Uuid) -> Result<Option<Paste>, AppError> {
        let query = format!("DELETE FROM pastes WHERE id = $1 RETURNING {}", PASTE_COLUMNS);
        let paste = sqlx::query_as::<_, Paste>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(paste)
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM pastes WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
