//! Error types for the gateway.

use std::time::Duration;

/// Errors that can occur while brokering a video-generation request.
#[derive(Debug, thiserror::Error)]
pub enum VidGateError {
    /// The caller sent an invalid or incomplete request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested provider name is not in the registry.
    #[error("unsupported provider: {0}")]
    ProviderNotSupported(String),

    /// A provider API returned a non-success response.
    /// The message carries the raw provider response body.
    #[error("provider API error: {status} - {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Raw response body from the provider.
        message: String,
    },

    /// A provider rate limit was hit.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Retry delay suggested by the provider, if any.
        retry_after: Option<Duration>,
    },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider reported that generation failed.
    #[error("video generation failed: {0}")]
    VideoGeneration(String),
}

impl VidGateError {
    /// Returns true if this error is likely transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }

    /// Returns the suggested retry delay, if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            Self::Network(_) => Some(Duration::from_secs(2)),
            _ => None,
        }
    }
}

/// Parses a `Retry-After` header value in seconds, if present.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, VidGateError>;
