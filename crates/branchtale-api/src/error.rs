//! Branchtale — API error types.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use branchtale_completion::CompletionError;
use branchtale_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Message returned in place of upstream failure details.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "failed to generate the next scene";

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The completion client could not be built.
    #[error("completion client error: {0}")]
    Completion(#[from] CompletionError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

// Malformed or non-JSON bodies are reported as validation errors, not 422.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::Validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::InvalidState(_) => (StatusCode::BAD_REQUEST, "state_error"),
            DomainError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            DomainError::ConcurrencyConflict { .. } => {
                (StatusCode::CONFLICT, "concurrency_conflict")
            }
            DomainError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let message = match &self.0 {
            DomainError::Upstream(detail) => {
                error!(detail = %detail, "scene generation failed");
                UPSTREAM_FAILURE_MESSAGE.to_owned()
            }
            DomainError::Infrastructure(detail) => {
                error!(detail = %detail, "infrastructure failure");
                self.0.to_string()
            }
            other => {
                warn!(error_code, error = %other, "request rejected");
                other.to_string()
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
