use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("ticket error: {0}")]
    Ticket(String),
    #[error("sentiment scorer error: {0}")]
    Sentiment(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("invalid template: {0}")]
    Parse(String),
    #[error("template could not be rendered: {0}")]
    Render(String),
}

pub type AppResult<T> = Result<T, AppError>;
