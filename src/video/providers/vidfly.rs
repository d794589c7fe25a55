//! Vidfly avatar/voice video provider.

use crate::error::{parse_retry_after, Result, VidGateError};
use crate::video::provider::VideoProvider;
use crate::video::types::{ProviderKind, RemoteStatus, VideoRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const BASE_URL: &str = "https://api.vidfly.ai/v1/videos";

/// Avatar used when the request does not specify one.
const DEFAULT_AVATAR: &str = "hector_default";

/// Voice used when the request does not specify one.
const DEFAULT_VOICE: &str = "hector_ai_voice";

/// Builder for [`VidflyProvider`].
#[derive(Debug, Clone)]
pub struct VidflyProviderBuilder {
    api_key: Option<String>,
    timeout: Duration,
}

impl Default for VidflyProviderBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl VidflyProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to the `VIDFLY_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the deadline applied to each outbound call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<VidflyProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("VIDFLY_API_KEY").ok())
            .ok_or_else(|| {
                VidGateError::InvalidRequest(
                    "VIDFLY_API_KEY not set and no API key provided".into(),
                )
            })?;

        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(VidflyProvider { client, api_key })
    }
}

/// Vidfly avatar video provider.
///
/// The prompt is spoken as the avatar's script.
pub struct VidflyProvider {
    client: reqwest::Client,
    api_key: String,
}

impl VidflyProvider {
    /// Creates a new [`VidflyProviderBuilder`].
    pub fn builder() -> VidflyProviderBuilder {
        VidflyProviderBuilder::new()
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
impl VideoProvider for VidflyProvider {
    async fn create(&self, request: &VideoRequest) -> Result<String> {
        let body = VidflyRequest::from_request(request);

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

        let submit_response: VidflySubmitResponse = response.json().await?;
        tracing::debug!(video_id = %submit_response.id, "submitted Vidfly video generation request");
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

        let poll_response: VidflyStatusResponse = response.json().await?;
        map_status_response(poll_response)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Vidfly
    }
}

/// Maps a Vidfly status payload onto [`RemoteStatus`].
fn map_status_response(response: VidflyStatusResponse) -> Result<RemoteStatus> {
    match response.status.as_str() {
        "queued" | "processing" => Ok(RemoteStatus::InProgress),
        "completed" => Ok(RemoteStatus::Completed {
            file_url: response.video_url,
        }),
        "failed" => Ok(RemoteStatus::Failed {
            reason: response.error.unwrap_or_else(|| "Unknown error".into()),
        }),
        other => Err(VidGateError::VideoGeneration(format!(
            "unexpected status: {}",
            other
        ))),
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct VidflyRequest {
    script: String,
    avatar_id: String,
    voice_id: String,
    duration: u32,
}

impl VidflyRequest {
    fn from_request(req: &VideoRequest) -> Self {
        Self {
            script: req.prompt.clone(),
            avatar_id: req
                .avatar
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            voice_id: req
                .voice
                .clone()
                .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            duration: req.duration_secs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VidflySubmitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct VidflyStatusResponse {
    status: String,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_explicit_key() {
        let provider = VidflyProviderBuilder::new().api_key("vf-test").build();
        assert!(provider.is_ok());
    }

    #[test]
    fn test_builder_without_key_fails() {
        std::env::remove_var("VIDFLY_API_KEY");
        let provider = VidflyProviderBuilder::new().build();
        assert!(provider.is_err());
    }

    #[test]
    fn test_request_construction_defaults() {
        let req = VideoRequest::new("Welcome to the demo");
        let vidfly_req = VidflyRequest::from_request(&req);

        assert_eq!(vidfly_req.script, "Welcome to the demo");
        assert_eq!(vidfly_req.avatar_id, "hector_default");
        assert_eq!(vidfly_req.voice_id, "hector_ai_voice");
        assert_eq!(vidfly_req.duration, 20);
    }

    #[test]
    fn test_request_construction_explicit_fields() {
        let req = VideoRequest::new("hi")
            .with_avatar("maria")
            .with_voice("maria_voice")
            .with_duration(10);
        let vidfly_req = VidflyRequest::from_request(&req);

        assert_eq!(vidfly_req.avatar_id, "maria");
        assert_eq!(vidfly_req.voice_id, "maria_voice");
        assert_eq!(vidfly_req.duration, 10);
    }

    #[test]
    fn test_request_serialization_uses_script_field() {
        let req = VideoRequest::new("hello");
        let json = serde_json::to_value(VidflyRequest::from_request(&req)).unwrap();

        assert_eq!(json.get("script").unwrap().as_str(), Some("hello"));
        assert!(json.get("prompt").is_none());
    }

    #[test]
    fn test_submit_response_deserialization() {
        let json = r#"{"id": "vf_123", "status": "queued"}"#;
        let resp: VidflySubmitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id, "vf_123");
    }

    #[test]
    fn test_status_in_progress() {
        for status in ["queued", "processing"] {
            let resp = VidflyStatusResponse {
                status: status.into(),
                video_url: None,
                error: None,
            };
            assert_eq!(
                map_status_response(resp).unwrap(),
                RemoteStatus::InProgress
            );
        }
    }

    #[test]
    fn test_status_completed_carries_video_url() {
        let json = r#"{"status": "completed", "video_url": "https://cdn.vidfly.ai/v/vf_123.mp4"}"#;
        let resp: VidflyStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            map_status_response(resp).unwrap(),
            RemoteStatus::Completed {
                file_url: Some("https://cdn.vidfly.ai/v/vf_123.mp4".into())
            }
        );
    }

    #[test]
    fn test_status_completed_without_url() {
        let resp = VidflyStatusResponse {
            status: "completed".into(),
            video_url: None,
            error: None,
        };
        assert_eq!(
            map_status_response(resp).unwrap(),
            RemoteStatus::Completed { file_url: None }
        );
    }

    #[test]
    fn test_status_failed() {
        let json = r#"{"status": "failed", "error": "avatar not found"}"#;
        let resp: VidflyStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            map_status_response(resp).unwrap(),
            RemoteStatus::Failed {
                reason: "avatar not found".into()
            }
        );
    }

    #[test]
    fn test_status_unexpected() {
        let resp = VidflyStatusResponse {
            status: "paused".into(),
            video_url: None,
            error: None,
        };
        assert!(map_status_response(resp).is_err());
    }
}
