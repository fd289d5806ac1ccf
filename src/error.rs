//! Error types for the catalog core.

use thiserror::Error;
use uuid::Uuid;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Item {0} is already loaned")]
    AlreadyLoaned(Uuid),

    #[error("Item {0} is not loaned")]
    NotLoaned(Uuid),

    #[error("Item {0} is loaned to someone else")]
    NotOwner(Uuid),

    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
