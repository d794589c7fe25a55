//! Route handlers and router construction.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::server::auth;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::task::{mint_task_id, Task, TaskStatus};
use crate::video::{RemoteStatus, VideoProviderExt, VideoRequest};

/// Build the complete Axum [`Router`] for the application.
///
/// The health check stays outside the auth layer; everything else requires
/// the shared secret.
pub fn build(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/create-video", post(create_video))
        .route("/video-status/{id}", get(video_status))
        .route("/video-file/{id}", get(video_file))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateVideoRequest {
    prompt: Option<String>,
    duration: Option<u32>,
    aspect_ratio: Option<String>,
    avatar: Option<String>,
    voice: Option<String>,
    provider: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVideoResponse {
    task_id: String,
    status: TaskStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileUrlResponse {
    file_url: String,
}

// ── handlers ─────────────────────────────────────────────────────────────────

/// Heartbeat endpoint. Unauthenticated.
async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// Validates the request, mints a task id, and dispatches to the selected
/// provider. The task row is inserted before the outbound call; if that call
/// fails the row stays in `processing` with no provider id.
async fn create_video(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateVideoRequest>,
) -> Result<Json<CreateVideoResponse>, ApiError> {
    let prompt = body
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Prompt required".into()))?;

    // Resolve the adapter first so an unsupported name stores nothing.
    let provider = state.providers.resolve(body.provider.as_deref())?;

    let mut request = VideoRequest::new(prompt);
    if let Some(duration) = body.duration {
        request = request.with_duration(duration);
    }
    if let Some(ratio) = body.aspect_ratio {
        request = request.with_aspect_ratio(ratio);
    }
    if let Some(avatar) = body.avatar {
        request = request.with_avatar(avatar);
    }
    if let Some(voice) = body.voice {
        request = request.with_voice(voice);
    }

    let task = Task::new(mint_task_id(), provider.kind());
    let task_id = task.id.clone();
    state.store.insert(task).await;

    let provider_task_id = provider
        .create_with_retries(&request, state.config.max_retries)
        .await?;

    if !state
        .store
        .attach_provider_task_id(&task_id, &provider_task_id)
        .await
    {
        warn!(task_id = %task_id, "task vanished before provider id could be attached");
    }

    info!(
        task_id = %task_id,
        provider = %provider.kind(),
        provider_task_id = %provider_task_id,
        "video task created"
    );

    Ok(Json(CreateVideoResponse {
        task_id,
        status: TaskStatus::Processing,
    }))
}

/// Returns the stored task record, refreshing it from the provider first.
async fn video_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = load_fresh(&state, &id).await?;
    Ok(Json(task))
}

/// Returns the finished video's URL, or 400 while it is not available.
async fn video_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileUrlResponse>, ApiError> {
    let task = load_fresh(&state, &id).await?;
    let file_url = task.file_url.ok_or(ApiError::NotReady)?;
    Ok(Json(FileUrlResponse { file_url }))
}

/// Loads a task, asking its provider for fresh state while it is still
/// `processing`.
///
/// A refresh failure is logged and the stored record returned unchanged, so
/// reads keep working while a provider is down. A task whose create call
/// never attached a provider id cannot be refreshed and stays `processing`.
async fn load_fresh(state: &AppState, id: &str) -> Result<Task, ApiError> {
    let task = state.store.get(id).await.ok_or(ApiError::NotFound)?;
    if task.status != TaskStatus::Processing {
        return Ok(task);
    }
    let Some(provider_task_id) = task.provider_task_id.clone() else {
        return Ok(task);
    };
    let provider = match state.providers.by_kind(task.provider) {
        Ok(p) => p,
        Err(_) => return Ok(task),
    };

    match provider.status(&provider_task_id).await {
        Ok(RemoteStatus::InProgress) => Ok(task),
        Ok(RemoteStatus::Completed { file_url }) => {
            info!(task_id = %id, "video ready");
            state.store.complete(id, file_url).await;
            Ok(state.store.get(id).await.unwrap_or(task))
        }
        Ok(RemoteStatus::Failed { reason }) => {
            warn!(task_id = %id, reason = %reason, "video generation failed");
            state.store.fail(id, &reason).await;
            Ok(state.store.get(id).await.unwrap_or(task))
        }
        Err(e) => {
            warn!(task_id = %id, error = %e, "provider status refresh failed");
            Ok(task)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
