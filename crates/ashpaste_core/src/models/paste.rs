//! Paste data models.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted paste. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Paste {
    pub id: Uuid,
    pub content: String,
    /// Display hint; empty means plain text.
    pub language: String,
    pub burn: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Paste {
    /// Build a fresh paste with a random id, stamped at `now`.
    ///
    /// Inputs are expected to have passed [`crate::validation::ContentValidator`].
    pub fn new(
        content: String,
        language: String,
        burn: bool,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            language,
            burn,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `now` is past this paste's expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Parse a client-supplied paste id.
///
/// # Errors
/// Returns [`AppError::InvalidId`] for anything that is not a UUID.
pub fn parse_paste_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId)
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePasteRequest {
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub burn: bool,
    pub expiry_minutes: i64,
}

/// Query parameters for raw-body creation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCreateQuery {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub burn: bool,
    pub expiry_minutes: i64,
}

/// Response payload for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatePasteResponse {
    pub id: String,
}
