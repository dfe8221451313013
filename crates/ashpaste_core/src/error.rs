//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Reasons a create request is rejected before it reaches storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Content exceeds maximum of {max} bytes ({size} bytes submitted)")]
    ContentTooLarge { size: usize, max: usize },

    #[error("Content must not be empty")]
    EmptyContent,

    #[error("Content is not valid UTF-8")]
    InvalidEncoding,

    #[error("Unsupported language tag")]
    InvalidLanguage,

    #[error("Invalid expiry: {0} minutes")]
    InvalidExpiry(i64),

    #[error("Expiry must be in the future")]
    ExpiryInPast,

    #[error("Expiry must be at most one year away")]
    ExpiryTooFar,
}

/// Failure modes reported by [`crate::db::ConnectionManager::health_check`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HealthCheckError {
    #[error("storage connection is not initialized")]
    NotInitialized,

    #[error("storage ping failed: {0}")]
    PingFailed(String),

    #[error("storage query failed: {0}")]
    QueryFailed(String),

    #[error("storage health check timed out after {0}s")]
    TimedOut(u64),
}

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Invalid paste id")]
    InvalidId,

    #[error("Not found")]
    NotFound,

    #[error("Paste has expired or been burned")]
    Gone,

    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Failed to connect to storage after {attempts} attempt(s): {last}")]
    Connection { attempts: u32, last: String },

    #[error("Health check failed: {0}")]
    HealthCheck(#[from] HealthCheckError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Whether this error came from the backing store rather than the caller.
    ///
    /// Storage failures are surfaced as internal errors and their details are
    /// never shown to untrusted callers.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Sql(_)
                | AppError::Serialization(_)
                | AppError::StorageMessage(_)
                | AppError::Timeout(_)
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::StorageMessage(format!("storage task failed: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_classification_covers_backend_errors_only() {
        assert!(AppError::StorageMessage("boom".into()).is_storage_failure());
        assert!(AppError::Timeout("fetch".into()).is_storage_failure());
        assert!(!AppError::NotFound.is_storage_failure());
        assert!(!AppError::Gone.is_storage_failure());
        assert!(!AppError::InvalidInput(ValidationError::EmptyContent).is_storage_failure());
        assert!(!AppError::HealthCheck(HealthCheckError::NotInitialized).is_storage_failure());
    }

    #[test]
    fn connection_error_reports_attempts_and_last_cause() {
        let err = AppError::Connection {
            attempts: 3,
            last: "connection refused".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("3 attempt"));
        assert!(message.contains("connection refused"));
    }
}
