//! vidgate - entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing.
//! 3. Build the provider adapters and the in-memory task store.
//! 4. Build the Axum router and start the HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use vidgate::server::{build, AppState, Config};
use vidgate::{InMemoryTaskStore, ProviderRegistry, SoraProvider, VidflyProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: VIDGATE_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!(version = env!("CARGO_PKG_VERSION"), "vidgate starting");

    if cfg.api_key.is_none() {
        warn!("VIDGATE_API_KEY not set; every protected endpoint will reject requests");
    }

    // ── 3. Providers & task store ──────────────────────────────────────────────
    let timeout = Duration::from_secs(cfg.request_timeout_secs);

    let mut sora = SoraProvider::builder().timeout(timeout);
    if let Some(key) = cfg.sora_api_key.clone() {
        sora = sora.api_key(key);
    }
    let sora = sora.build().context("configuring Sora provider")?;

    let mut vidfly = VidflyProvider::builder().timeout(timeout);
    if let Some(key) = cfg.vidfly_api_key.clone() {
        vidfly = vidfly.api_key(key);
    }
    let vidfly = vidfly.build().context("configuring Vidfly provider")?;

    let registry = ProviderRegistry::new()
        .register(Arc::new(sora))
        .register(Arc::new(vidfly));

    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        store: Arc::new(InMemoryTaskStore::new()),
        providers: Arc::new(registry),
    });

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let app = build(state);
    let addr: SocketAddr = cfg.bind_address.parse().context("parsing bind address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vidgate stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
