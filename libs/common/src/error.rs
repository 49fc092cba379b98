//! Custom error types for the common library
//!
//! This module defines the database error taxonomy shared by the services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No connection string was provided through the environment
    #[error("Database not configured")]
    NotConfigured,

    /// The connection string could not be turned into connect options
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// Error occurred while opening the pool or probing connectivity
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred while creating the tables
    #[error("Database schema error: {0}")]
    Schema(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("{0}")]
    Query(#[from] SqlxError),
}

impl DatabaseError {
    /// Message of the underlying driver error, without the layer prefix
    pub fn cause(&self) -> String {
        match self {
            DatabaseError::NotConfigured => self.to_string(),
            DatabaseError::Configuration(msg) => msg.clone(),
            DatabaseError::Connection(e) | DatabaseError::Schema(e) | DatabaseError::Query(e) => {
                e.to_string()
            }
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
