//! Error types for msgboard.

use thiserror::Error;

/// Common error type for msgboard.
#[derive(Error, Debug)]
pub enum MsgboardError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// A thread kept changing underneath a read-modify-write.
    #[error("update contention on thread {0}")]
    Contention(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A referenced thread or reply does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The supplied delete password did not match.
    ///
    /// Also returned by thread deletion when the thread id is unknown, so that
    /// password probing cannot reveal which threads exist.
    #[error("incorrect password")]
    IncorrectPassword,

    /// A required field was absent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential hashing failed.
    #[error("password error: {0}")]
    Password(#[from] crate::auth::PasswordError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for MsgboardError {
    fn from(e: sqlx::Error) -> Self {
        MsgboardError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for MsgboardError {
    fn from(e: serde_json::Error) -> Self {
        MsgboardError::Database(format!("corrupt reply document: {e}"))
    }
}

/// Result type alias for msgboard operations.
pub type Result<T> = std::result::Result<T, MsgboardError>;
