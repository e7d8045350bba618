//! Relay server assembly and entry point.

use std::{collections::HashMap, sync::Arc};

use axum::{Router, routing::get};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::{
    config::{ServerConfig, StoreBackend},
    domain::SessionStore,
    infrastructure::store::{InMemorySessionStore, RedisSessionStore},
    ui::{
        handler::{get_games, health_check, websocket_handler},
        state::AppState,
    },
    usecase::RoomLifecycle,
};

/// Build the application router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/games", get(get_games))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Assemble the shared state for the configured store backend.
///
/// Store reachability is verified up front: a relay that starts without
/// its store would refuse every admission, so startup fails instead.
pub async fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, Box<dyn std::error::Error>> {
    let (store, backend): (Arc<dyn SessionStore>, &'static str) = match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; rooms will not survive a restart");
            (Arc::new(InMemorySessionStore::new()), "memory")
        }
        StoreBackend::Redis => {
            let store = RedisSessionStore::connect(&config.redis_url).await?;
            (Arc::new(store), "redis")
        }
    };
    store.ping().await?;
    tracing::info!("Session store '{}' is reachable", backend);

    Ok(Arc::new(AppState {
        store: store.clone(),
        lifecycle: RoomLifecycle::new(store, config.room_ttl()),
        backend,
        session_ttl: config.session_ttl(),
        rooms: Arc::new(Mutex::new(HashMap::new())),
    }))
}

/// Run the relay server until shutdown.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
