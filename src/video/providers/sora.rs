//! Sora text-to-video provider.

use crate::error::{parse_retry_after, Result, VidGateError};
use crate::video::provider::VideoProvider;
use crate::video::types::{ProviderKind, RemoteStatus, VideoRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://api.openai.com/v1/videos";

/// Aspect ratio sent when the request does not specify one.
const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Sora model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoraModel {
    /// First-generation Sora model.
    #[default]
    Sora1,
}

impl SoraModel {
    /// Returns the API model identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sora1 => "sora-1",
        }
    }
}

/// Builder for [`SoraProvider`].
#[derive(Debug, Clone)]
pub struct SoraProviderBuilder {
    api_key: Option<String>,
    model: SoraModel,
    timeout: Duration,
}

impl Default for SoraProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: SoraModel::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SoraProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `SORA_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Sora model variant.
    pub fn model(mut self, model: SoraModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the deadline applied to each outbound call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<SoraProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("SORA_API_KEY").ok())
            .ok_or_else(|| {
                VidGateError::InvalidRequest("SORA_API_KEY not set and no API key provided".into())
            })?;

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(SoraProvider {
            client,
            api_key,
            model: self.model,
        })
    }
}

/// Sora video generation provider.
pub struct SoraProvider {
    client: reqwest::Client,
    api_key: String,
    model: SoraModel,
}

impl SoraProvider {
    /// Creates a new [`SoraProviderBuilder`].
    pub fn builder() -> SoraProviderBuilder {
        SoraProviderBuilder::new()
    }

    fn parse_error(&self, status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> VidGateError {
        if status == 429 {
            let retry_after = parse_retry_after(headers).map(Duration::from_secs);
            return VidGateError::RateLimited { retry_after };
        }
        VidGateError::Api {
            status,
            message: text.to_owned(),
        }
    }
}

#[async_trait]
impl VideoProvider for SoraProvider {
    async fn create(&self, request: &VideoRequest) -> Result<String> {
        let body = SoraRequest::from_request(request, &self.model);

        let response = self
            .client
            .post(BASE_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text, &headers));
        }

        let submit_response: SoraSubmitResponse = response.json().await?;
        tracing::debug!(video_id = %submit_response.id, "submitted Sora video generation request");
        Ok(submit_response.id)
    }

    async fn status(&self, provider_task_id: &str) -> Result<RemoteStatus> {
        let url = format!("{}/{}", BASE_URL, provider_task_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(self.parse_error(status.as_u16(), &text, &headers));
        }

        let poll_response: SoraPollResponse = response.json().await?;
        map_poll_response(poll_response, provider_task_id)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Sora
    }
}

/// Maps a Sora poll payload onto [`RemoteStatus`].
fn map_poll_response(response: SoraPollResponse, provider_task_id: &str) -> Result<RemoteStatus> {
    match response.status.as_str() {
        "queued" | "in_progress" => Ok(RemoteStatus::InProgress),
        // Finished videos are fetched through the content sub-resource.
        "completed" => Ok(RemoteStatus::Completed {
            file_url: Some(format!("{}/{}/content", BASE_URL, provider_task_id)),
        }),
        "failed" => {
            let reason = response
                .failure_reason
                .or_else(|| response.error.and_then(|e| e.message))
                .unwrap_or_else(|| "Unknown error".into());
            Ok(RemoteStatus::Failed { reason })
        }
        other => Err(VidGateError::VideoGeneration(format!(
            "unexpected status: {}",
            other
        ))),
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct SoraRequest {
    model: String,
    prompt: String,
    duration: u32,
    aspect_ratio: String,
}

impl SoraRequest {
    fn from_request(req: &VideoRequest, model: &SoraModel) -> Self {
        Self {
            model: model.as_str().to_string(),
            prompt: req.prompt.clone(),
            duration: req.duration_secs,
            aspect_ratio: req
                .aspect_ratio
                .clone()
                .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SoraSubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SoraPollResponse {
    status: String,
    #[serde(default)]
    failure_reason: Option<String>,
    #[serde(default)]
    error: Option<SoraError>,
}

#[derive(Debug, Deserialize)]
struct SoraError {
    #[serde(default)]
    message: Option<String>,
}
