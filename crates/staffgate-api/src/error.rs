//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use staffgate_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Generic, caller-safe message for the error kind.
    pub message: String,
}

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::BadRequest | ErrorKind::PreconditionFailed | ErrorKind::Conflict => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::DependencyFailure => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Configuration | ErrorKind::Serialization | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0.declined_on_conflict();
        let kind = err.kind;
        let status = status_for(kind);

        if status.is_server_error() {
            error!(kind = %kind, error = %err, "Request failed");
        } else {
            debug!(kind = %kind, reason = %err.message, "Request declined");
        }

        let body = ApiErrorResponse {
            error: kind.to_string(),
            message: kind.public_message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}
