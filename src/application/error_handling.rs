// src/application/error_handling.rs
//
// Error handling for HTTP handlers
//
// ARCHITECTURE:
// - Maps internal errors → HTTP status + JSON body
// - Never exposes store internals for 5xx responses
// - Logs server-side failures

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repositories::RepoError;

/// Standard error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// 404
    NotFound,

    /// 422
    Validation,

    /// 400
    BadRequest,

    /// 409
    Conflict,

    /// 500
    Database,

    /// 500
    Internal,
}

impl ErrorType {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Conflict => StatusCode::CONFLICT,
            ErrorType::Database | ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Repository(repo_error) => Self::from_repo_error(repo_error),

            AppError::Database(_) | AppError::Pool(_) => {
                log::error!("Database failure: {}", error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            other => {
                log::error!("Request failed: {}", other);
                Self::new(ErrorType::Internal, "Internal error", None)
            }
        }
    }

    fn from_repo_error(error: &RepoError) -> Self {
        match error {
            RepoError::Validation(errors) => Self::new(
                ErrorType::Validation,
                "Validation failed",
                Some(errors.to_string()),
            ),
            RepoError::Conflict { .. } => {
                Self::new(ErrorType::Conflict, error.to_string(), None)
            }
            RepoError::InvalidPage { .. }
            | RepoError::UnknownColumn { .. }
            | RepoError::MissingKey { .. }
            | RepoError::AmbiguousMatch { .. } => {
                Self::new(ErrorType::BadRequest, error.to_string(), None)
            }
            RepoError::Store(_) | RepoError::Pool(_) | RepoError::Task(_) => {
                log::error!("Repository failure: {}", error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from_app_error(&self);
        (body.error_type.status(), Json(body)).into_response()
    }
}
