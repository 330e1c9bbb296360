use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Hackathon not found: {0}")]
    HackathonNotFound(String),

    #[error("Team member not found: {0}")]
    MemberNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, EventError>;
