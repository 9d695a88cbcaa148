use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Errors returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Domain(Error),
    /// The request itself could not be read (bad JSON, bad path or query).
    BadRequest(String),
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Domain(e)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Domain(e) => match e {
                Error::EmptyNotes => (StatusCode::BAD_REQUEST, "EMPTY_NOTES"),
                Error::InvalidOutcome(_) => (StatusCode::BAD_REQUEST, "INVALID_OUTCOME"),
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                Error::Validation(_) => (StatusCode::BAD_GATEWAY, "INVALID_GENERATION"),
                Error::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                Error::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
                Error::Corrupt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CORRUPT_RECORD"),
                Error::Schedule(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SCHEDULE_ERROR"),
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(e) => e.to_string(),
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(%status, code, error = %message, "request failed");
        } else {
            tracing::debug!(%status, code, error = %message, "request rejected");
        }

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
