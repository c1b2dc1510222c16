//! Scorekeep backend entrypoint: loads the configuration, opens storage and serves the
//! REST API until a shutdown signal arrives.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorekeep_back::{
    config::AppConfig,
    dao::kv_store::{FileBackend, KeyValueBackend, MemoryBackend},
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let backend = open_backend(&config).await;

    let app_state = AppState::new(config, backend);
    let port = app_state.config().port;
    let default_route = app_state.config().default_route.clone();
    app_state
        .navigator()
        .await
        .navigate(&default_route, Default::default())
        .await;

    let app = build_router(app_state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    // Leaving the live view flushes any score edit still waiting for its debounce.
    app_state.shutdown().await;
    info!("server stopped");

    Ok(())
}

/// Pick the storage backend. A data directory that cannot be opened falls back to memory.
async fn open_backend(config: &AppConfig) -> Arc<dyn KeyValueBackend> {
    if config.in_memory {
        info!("using in-memory storage; nothing will survive a restart");
        return Arc::new(MemoryBackend::new());
    }

    match FileBackend::open(&config.data_dir, &config.storage_prefix).await {
        Ok(backend) => {
            info!(dir = %config.data_dir.display(), "using file storage");
            Arc::new(backend)
        }
        Err(err) => {
            warn!(
                dir = %config.data_dir.display(),
                error = %err,
                "cannot open data directory; falling back to in-memory storage"
            );
            Arc::new(MemoryBackend::new())
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
