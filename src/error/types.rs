// src/error/types.rs
use thiserror::Error;

use crate::repositories::RepoError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl From<flexi_logger::FlexiLoggerError> for AppError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        AppError::Config(format!("Logger setup failed: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
