//! Shared-secret authentication middleware.
//!
//! Fails closed: a missing configured secret rejects every request rather
//! than letting traffic through unauthenticated.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Header carrying the caller's shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `x-api-key` header does not match the configured
/// shared secret.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match (state.config.api_key.as_deref(), provided) {
        (Some(expected), Some(key)) if key == expected => next.run(req).await,
        _ => ApiError::Unauthorized.into_response(),
    }
}
