//! Infrastructure layer for Modelabs
//!
//! This crate provides implementations for:
//! - Database access (PostgreSQL with sqlx, JSONB documents)
//! - In-memory stores for development and tests
//! - Object storage (S3 and in-memory)
//!
//! ## Architecture
//!
//! Each store implements one of the ports defined in
//! `modelabs-application` (`ModelRecordStore`, `DatasetStore`, `BlobStore`),
//! so the API layer can swap backends without touching services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use modelabs_infrastructure::{DatabaseConfig, DatabasePool, PgModelStore};
//!
//! let db_config = DatabaseConfig::from_env()?;
//! let pool = DatabasePool::new(&db_config).await?;
//! pool.ensure_schema().await?;
//!
//! let models = PgModelStore::new(pool.pool().clone());
//! ```

pub mod database;
pub mod repositories;
pub mod storage;

// Re-export commonly used types
pub use database::{DatabaseConfig, DatabasePool};
pub use repositories::{InMemoryDatasetStore, InMemoryModelStore, PgDatasetStore, PgModelStore};
pub use storage::{InMemoryBlobStore, S3BlobStore, StorageConfig, StoredBlob};

use modelabs_application::ApplicationError;

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database errors from sqlx
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage errors from S3 operations
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored document does not decode into a domain value
    #[error("Corrupt document {key}: {reason}")]
    CorruptDocument { key: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Storage(_))
    }
}

impl From<Error> for ApplicationError {
    fn from(err: Error) -> Self {
        ApplicationError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let db_err = Error::Database(sqlx::Error::PoolTimedOut);
        assert!(db_err.is_retryable());

        let config = Error::Configuration("bad config".to_string());
        assert!(!config.is_retryable());
    }

    #[test]
    fn test_errors_become_internal() {
        let err: ApplicationError = Error::Storage("bucket unreachable".to_string()).into();
        assert_eq!(err.http_status(), 500);
        assert!(err.message().contains("bucket unreachable"));
    }
}
