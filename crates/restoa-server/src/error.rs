//! API error types with JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use restoa_core::CoreError;
use restoa_store::StoreError;
use serde::Serialize;

use crate::orchestrator::CrudError;

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed request (400): bad body, target, fragment or path.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Not found (404). Rendered with an empty body.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unsupported operation on this resource (405).
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Store error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotSupported(_) => "NOT_SUPPORTED",
            Self::Store(StoreError::DocumentNotFound(_)) => "NOT_FOUND",
            Self::Store(StoreError::Core(_)) => "BAD_REQUEST",
            Self::Store(StoreError::DuplicateAnnotation { .. }) => "CONFLICT",
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::NotSupported(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Store(e) => match e {
                StoreError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Core(_) => StatusCode::BAD_REQUEST,
                StoreError::DuplicateAnnotation { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<CrudError> for ApiError {
    fn from(e: CrudError) -> Self {
        match e {
            CrudError::MalformedRequest(message) => Self::BadRequest(message),
            not_found @ CrudError::NotFound { .. } => Self::NotFound(not_found.to_string()),
            CrudError::NotSupported(message) => Self::NotSupported(message),
            CrudError::Store(e) => Self::Store(e),
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code (e.g., "BAD_REQUEST", "NOT_SUPPORTED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Clients of the annotation API expect a bare 404.
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(error = %self, "Not found");
            return status.into_response();
        }
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
