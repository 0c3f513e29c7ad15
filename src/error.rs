// Photo Critic Error Types

use thiserror::Error;

use crate::detection::DetectionFailure;

#[derive(Error, Debug)]
pub enum PhotoCriticError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionFailure),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PhotoCriticError>;
