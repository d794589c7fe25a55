//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::server::config::Config;
use crate::task::TaskStore;
use crate::video::ProviderRegistry;

/// State shared across all HTTP handlers.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Task table. Trait object so tests can substitute fakes.
    pub store: Arc<dyn TaskStore>,
    /// Provider dispatch table.
    pub providers: Arc<ProviderRegistry>,
}
