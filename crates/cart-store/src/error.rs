//! # Store Error Types
//!
//! Error types for key-value store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├── hydrate: logged, cart falls back to empty                    │
//! │       └── persist: logged, counted, in-memory cart stays authoritative │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot serve reads or writes right now.
    ///
    /// ## When This Occurs
    /// - Backing file locked or on a read-only volume
    /// - A test store switched to failing mode
    /// - Pool closed during shutdown
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Opening the backing database failed.
    ///
    /// ## When This Occurs
    /// - Directory does not exist or is not writable
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A read or write statement failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable(reason.into())
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → StoreError::QueryFailed
/// sqlx::Error::PoolTimedOut   → StoreError::Unavailable
/// sqlx::Error::PoolClosed     → StoreError::Unavailable
/// sqlx::Error::Io             → StoreError::Unavailable
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => StoreError::unavailable("Connection pool timed out"),
            sqlx::Error::PoolClosed => StoreError::unavailable("Pool is closed"),
            sqlx::Error::Io(io) => StoreError::Unavailable(io.to_string()),
            _ => StoreError::Internal(err.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_closed_maps_to_unavailable() {
        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::unavailable("disk is read-only");
        assert_eq!(err.to_string(), "Storage unavailable: disk is read-only");
    }
}
