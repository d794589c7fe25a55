//! Unified server error type.
//!
//! Every handler returns `Result<T, ApiError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::VidGateError;

/// All errors that can occur in the request lifecycle.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid `x-api-key` header.
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller sent an invalid or malformed request.
    #[error("{0}")]
    BadRequest(String),

    /// The caller referenced a task that does not exist.
    #[error("Task not found")]
    NotFound,

    /// The task has no file URL yet.
    #[error("Video not ready")]
    NotReady,

    /// An outbound provider call failed; the message echoes the provider.
    #[error("{0}")]
    Provider(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::NotReady => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Provider(m) => {
                error!(message = %m, "provider call failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<VidGateError> for ApiError {
    fn from(e: VidGateError) -> Self {
        match e {
            VidGateError::InvalidRequest(m) => ApiError::BadRequest(m),
            VidGateError::ProviderNotSupported(name) => {
                ApiError::BadRequest(format!("Unsupported provider: {name}"))
            }
            other => ApiError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::BadRequest("Prompt required".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ApiError::NotReady), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(ApiError::Provider("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_core_error() {
        let err: ApiError = VidGateError::ProviderNotSupported("xyz".into()).into();
        assert!(matches!(&err, ApiError::BadRequest(m) if m == "Unsupported provider: xyz"));

        let err: ApiError = VidGateError::Api {
            status: 503,
            message: "{\"error\":\"overloaded\"}".into(),
        }
        .into();
        // Provider errors surface the raw provider payload to the caller.
        assert!(matches!(&err, ApiError::Provider(m) if m.contains("overloaded")));
    }
}
