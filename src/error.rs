use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::state::{game::InconsistentGame, session::SessionError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the caller (validation failure).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The session controller rejected the operation.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<InconsistentGame> for ServiceError {
    fn from(err: InconsistentGame) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Session(err @ SessionError::EmptyName) => {
                AppError::BadRequest(err.to_string())
            }
            ServiceError::Session(err) => AppError::Conflict(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn session_errors_map_to_http_statuses() {
        let finished: AppError = ServiceError::from(SessionError::Finished(Uuid::nil())).into();
        assert!(matches!(finished, AppError::Conflict(_)));

        let blank: AppError = ServiceError::from(SessionError::EmptyName).into();
        assert!(matches!(blank, AppError::BadRequest(_)));

        let response = AppError::NotFound("game".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
