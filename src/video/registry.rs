//! Provider registry: maps provider names to adapters.
//!
//! Dispatch is an explicit table. An unknown name is an error, it never
//! falls through to some other provider.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, VidGateError};
use crate::video::provider::VideoProvider;
use crate::video::types::ProviderKind;

/// The provider used when a creation request names none.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::Sora;

/// Registry of available video providers, keyed by [`ProviderKind`].
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn VideoProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider, keyed by its own [`VideoProvider::kind`].
    pub fn register(mut self, provider: Arc<dyn VideoProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Resolves a caller-supplied provider name to an adapter.
    ///
    /// `None` selects [`DEFAULT_PROVIDER`]. Unknown or unregistered names
    /// fail with [`VidGateError::ProviderNotSupported`].
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn VideoProvider>> {
        let kind = match name {
            None => DEFAULT_PROVIDER,
            Some(name) => ProviderKind::from_name(name)
                .ok_or_else(|| VidGateError::ProviderNotSupported(name.to_owned()))?,
        };
        self.by_kind(kind)
    }

    /// Looks up the adapter registered for a provider kind.
    pub fn by_kind(&self, kind: ProviderKind) -> Result<Arc<dyn VideoProvider>> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| VidGateError::ProviderNotSupported(kind.to_string()))
    }

    /// Returns the registered provider kinds.
    pub fn kinds(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.providers.keys().copied()
    }
}
