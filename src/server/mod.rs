//! HTTP server: configuration, state, auth, and the route surface.

mod auth;
mod config;
mod error;
mod routes;
mod state;

pub use config::Config;
pub use error::ApiError;
pub use routes::build;
pub use state::AppState;
