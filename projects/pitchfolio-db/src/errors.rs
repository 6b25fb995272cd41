use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("No account matches those credentials")]
    InvalidCredentials,

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Portfolio not found: {0}")]
    PortfolioNotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
