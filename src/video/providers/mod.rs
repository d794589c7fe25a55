//! Video generation providers.

mod sora;
mod vidfly;

pub use sora::{SoraModel, SoraProvider, SoraProviderBuilder};
pub use vidfly::{VidflyProvider, VidflyProviderBuilder};
