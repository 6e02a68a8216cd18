use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to decode message: {0}")]
    Decode(String),

    #[error("Invalid token statistics: {0}")]
    InvalidStatistics(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpamError>;
