#![warn(missing_docs)]
//! vidgate - HTTP gateway for hosted video-generation APIs.
//!
//! Creation requests are validated, assigned a local task id, and forwarded
//! to one of the registered providers (Sora text-to-video or Vidfly avatar
//! video). Callers poll the gateway for status and the finished video's
//! location; the gateway refreshes a still-running task from its provider
//! whenever it is read.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidgate::server::{build, AppState, Config};
//! use vidgate::{InMemoryTaskStore, ProviderRegistry, SoraProvider, VidflyProvider};
//!
//! #[tokio::main]
//! async fn main() -> vidgate::Result<()> {
//!     let registry = ProviderRegistry::new()
//!         .register(Arc::new(SoraProvider::builder().build()?))
//!         .register(Arc::new(VidflyProvider::builder().build()?));
//!
//!     let state = Arc::new(AppState {
//!         config: Arc::new(Config::from_env()),
//!         store: Arc::new(InMemoryTaskStore::new()),
//!         providers: Arc::new(registry),
//!     });
//!
//!     let app = build(state);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//!     Ok(())
//! }
//! ```
//!
//! All state is process-lifetime only; nothing survives a restart.

mod error;
pub mod server;
pub mod task;
pub mod video;

pub use error::{Result, VidGateError};

// Re-export commonly used types at the crate root.
pub use task::{InMemoryTaskStore, Task, TaskStatus, TaskStore};
pub use video::providers::{
    SoraModel, SoraProvider, SoraProviderBuilder, VidflyProvider, VidflyProviderBuilder,
};
pub use video::{
    ProviderKind, ProviderRegistry, RemoteStatus, VideoProvider, VideoProviderExt, VideoRequest,
};
