use thiserror::Error;

use crate::groq::OracleError;

#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
