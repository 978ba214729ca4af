//! Common error types for MESAlpha

use thiserror::Error;

/// Common result type for MESAlpha operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MESAlpha services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record store could not produce a batch at all
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
