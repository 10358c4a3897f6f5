//! Error types for quotes-core

use thiserror::Error;

/// Result type alias using quotes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Quote not found
    #[error("Quote not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rejected quote
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persistence provider error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Reasons a normalized quote is refused by the replica.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("quote text must not be empty")]
    EmptyText,
    #[error("quote category must not be empty")]
    EmptyCategory,
    #[error("a quote with id {0} already exists")]
    DuplicateId(String),
}
