use thiserror::Error;

/// Error type for schema import and database operations.
#[derive(Error, Debug)]
pub enum DbError {
    /// Error that occurs during database interactions (e.g., a rejected CREATE or ALTER).
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// The dump could not be read.
    #[error("Import error: {0}")]
    Import(String),
    /// Configuration error (e.g., unreadable config file or invalid value).
    #[error("Configuration error: {0}")]
    Config(String),
    /// Connection error (e.g., issues with network or database connection).
    #[error("Connection error: {0}")]
    Connection(String),
    /// General error with a custom message.
    #[error("Error: {0}")]
    General(String),
}
