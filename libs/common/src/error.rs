//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

/// Server error code MongoDB reports for a unique index violation
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while establishing or checking the connection
    #[error("Database connection error: {0}")]
    Connection(#[source] MongoError),

    /// Error occurred during query or command execution
    #[error("Database query error: {0}")]
    Query(#[source] MongoError),

    /// A write violated a unique index
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// A document could not be converted to or from BSON
    #[error("Database serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a driver error raised by a write, surfacing unique index
    /// violations as [`DatabaseError::Duplicate`]
    pub fn from_write(err: MongoError) -> Self {
        if is_duplicate_key(&err) {
            DatabaseError::Duplicate(err.to_string())
        } else {
            DatabaseError::Query(err)
        }
    }
}

/// Whether a driver error is a unique index violation
pub fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl From<bson::ser::Error> for DatabaseError {
    fn from(err: bson::ser::Error) -> Self {
        DatabaseError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for DatabaseError {
    fn from(err: bson::de::Error) -> Self {
        DatabaseError::Serialization(err.to_string())
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
