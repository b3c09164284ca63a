//! Database error taxonomy shared by the booking services

use thiserror::Error;

/// Failures raised by the shared database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not be established or a connection was lost
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed to execute
    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// The connection settings were unusable
    #[error("database configuration invalid: {0}")]
    Configuration(String),
}

/// Result type for database-layer operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
