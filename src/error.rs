//! Error types for Mailroom.

use thiserror::Error;

/// Common error type for Mailroom.
#[derive(Error, Debug)]
pub enum MailroomError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (unknown user, wrong password, no session).
    #[error("authentication error: {0}")]
    Auth(String),

    /// The resource already exists (e.g. a taken username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Password hashing error.
    #[error("password error: {0}")]
    Password(#[from] crate::auth::PasswordError),

    /// Session token error.
    #[error("session error: {0}")]
    Session(#[from] crate::auth::SessionError),
}

impl From<sqlx::Error> for MailroomError {
    fn from(e: sqlx::Error) -> Self {
        MailroomError::Database(e.to_string())
    }
}

/// Result type alias for Mailroom operations.
pub type Result<T> = std::result::Result<T, MailroomError>;
