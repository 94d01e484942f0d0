use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid step: ({dx}, {dy}) must move exactly one cell along one axis")]
    InvalidStep { dx: i32, dy: i32 },

    #[error("Narrative service not configured: {0}")]
    NotConfigured(String),

    #[error("Narrative error: {0}")]
    Narrative(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
