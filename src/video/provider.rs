//! Video provider trait and utilities.

use crate::error::Result;
use crate::video::types::{ProviderKind, RemoteStatus, VideoRequest};
use async_trait::async_trait;

/// Trait for video generation providers.
///
/// Providers submit jobs and answer status queries; they never block on a
/// job's completion themselves.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Submits a generation job. Returns the provider's task identifier.
    async fn create(&self, request: &VideoRequest) -> Result<String>;

    /// Queries the provider for the current state of a submitted job.
    async fn status(&self, provider_task_id: &str) -> Result<RemoteStatus>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ProviderKind::Sora => "Sora text-to-video",
            ProviderKind::Vidfly => "Vidfly avatar video",
        }
    }
}

/// Extension trait for providers with retry logic.
#[async_trait]
pub trait VideoProviderExt: VideoProvider {
    /// Submits with automatic retries on transient failures.
    async fn create_with_retries(
        &self,
        request: &VideoRequest,
        max_retries: u32,
    ) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match self.create(request).await {
                Ok(id) => return Ok(id),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = e.retry_after().unwrap_or(std::time::Duration::from_secs(1));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries,
                        delay_ms = delay.as_millis(),
                        "retrying after transient error: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.expect("should have error after retries"))
    }
}

impl<T: VideoProvider + ?Sized> VideoProviderExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VidGateError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with a retryable error the first `failures` times, then succeeds.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl VideoProvider for FlakyProvider {
        async fn create(&self, _request: &VideoRequest) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(VidGateError::RateLimited {
                    retry_after: Some(std::time::Duration::from_millis(1)),
                })
            } else {
                Ok("remote-1".into())
            }
        }

        async fn status(&self, _provider_task_id: &str) -> Result<RemoteStatus> {
            Ok(RemoteStatus::InProgress)
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Sora
        }
    }

    /// Always fails with a non-retryable error.
    struct BrokenProvider {
        calls: AtomicU32,
    }

    #[async_trait]
    impl VideoProvider for BrokenProvider {
        async fn create(&self, _request: &VideoRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(VidGateError::Api {
                status: 400,
                message: "bad prompt".into(),
            })
        }

        async fn status(&self, _provider_task_id: &str) -> Result<RemoteStatus> {
            Ok(RemoteStatus::InProgress)
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Vidfly
        }
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let provider = FlakyProvider {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        let request = VideoRequest::new("test");

        let id = provider.create_with_retries(&request, 3).await.unwrap();
        assert_eq!(id, "remote-1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let provider = FlakyProvider {
            failures: 10,
            calls: AtomicU32::new(0),
        };
        let request = VideoRequest::new("test");

        let err = provider.create_with_retries(&request, 2).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let provider = BrokenProvider {
            calls: AtomicU32::new(0),
        };
        let request = VideoRequest::new("test");

        let err = provider.create_with_retries(&request, 5).await.unwrap_err();
        assert!(matches!(err, VidGateError::Api { status: 400, .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn provider_display_names() {
        struct Named(ProviderKind);

        #[async_trait]
        impl VideoProvider for Named {
            async fn create(&self, _request: &VideoRequest) -> Result<String> {
                unimplemented!()
            }
            async fn status(&self, _provider_task_id: &str) -> Result<RemoteStatus> {
                unimplemented!()
            }
            fn kind(&self) -> ProviderKind {
                self.0
            }
        }

        assert_eq!(Named(ProviderKind::Sora).name(), "Sora text-to-video");
        assert_eq!(Named(ProviderKind::Vidfly).name(), "Vidfly avatar video");
    }
}
