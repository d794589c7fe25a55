//! Core types shared by the video providers.

use serde::{Deserialize, Serialize};

/// Default video duration in seconds when the caller does not specify one.
pub const DEFAULT_DURATION_SECS: u32 = 20;

/// Video provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Text-to-video generation.
    Sora,
    /// Avatar/voice video generation.
    Vidfly,
}

impl ProviderKind {
    /// Resolves a provider name as it appears in API requests.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sora" => Some(Self::Sora),
            "vidfly" => Some(Self::Vidfly),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sora => write!(f, "sora"),
            Self::Vidfly => write!(f, "vidfly"),
        }
    }
}

/// A request to generate a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    /// The text prompt. Avatar providers read it as the script to speak.
    pub prompt: String,
    /// Desired video duration in seconds.
    pub duration_secs: u32,
    /// Aspect ratio (e.g., "16:9", "9:16").
    pub aspect_ratio: Option<String>,
    /// Avatar identifier (avatar providers only).
    pub avatar: Option<String>,
    /// Voice identifier (avatar providers only).
    pub voice: Option<String>,
}

impl VideoRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            duration_secs: DEFAULT_DURATION_SECS,
            aspect_ratio: None,
            avatar: None,
            voice: None,
        }
    }

    /// Sets the desired video duration in seconds.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Sets the avatar identifier.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Sets the voice identifier.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

/// State of a submitted job as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteStatus {
    /// The provider is still working on the job.
    InProgress,
    /// The job finished; the video can be fetched from `file_url` when the
    /// provider exposes one.
    Completed {
        /// Download location of the finished video, if reported.
        file_url: Option<String>,
    },
    /// The job failed on the provider side.
    Failed {
        /// Provider-reported failure reason.
        reason: String,
    },
}
