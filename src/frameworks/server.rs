// Framework bootstrap for the simulation server runtime.

use crate::domain::tuning::GameTuning;
use crate::frameworks::config;
use crate::interface_adapters::levels;
use crate::interface_adapters::net::{
    create_session_handler, delete_session_handler, select_level_handler,
    spawn_session_serializer, ws_handler,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{SessionRegistry, SessionSettings};

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state().await?;
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{session_id}", delete(delete_session_handler))
        .route("/sessions/{session_id}/level", post(select_level_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn load_tuning() -> Result<GameTuning> {
    let Some(path) = config::game_config_path() else {
        return Ok(GameTuning::default());
    };
    let tuning = config::load_tuning(&path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "invalid game config");
        std::io::Error::other(e)
    })?;
    tracing::info!(path = %path.display(), "game config loaded");
    Ok(tuning)
}

async fn build_state() -> Result<Arc<AppState>> {
    let tuning = load_tuning()?;

    let loaded = match config::levels_path() {
        Some(path) => levels::load_levels(&path, &tuning.world),
        None => levels::builtin_levels(&tuning.world),
    };
    let levels = loaded.map_err(|e| {
        tracing::error!(error = %e, "failed to load levels");
        std::io::Error::other(e)
    })?;

    let tick_interval = config::tick_interval();
    tracing::debug!(
        level_count = levels.len(),
        tick_interval_ms = tick_interval.as_millis(),
        "simulation configured"
    );

    // Owns the set of active session world tasks.
    let session_registry = Arc::new(SessionRegistry::new(
        SessionSettings {
            input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
            world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
            tick_interval,
        },
        levels.into(),
        tuning,
    ));

    // The default session is pinned; it cannot be deleted over HTTP.
    let default_session = session_registry
        .create_session(config::DEFAULT_SESSION_ID.to_string())
        .await
        .map_err(std::io::Error::other)?;
    spawn_session_serializer(&default_session);

    Ok(Arc::new(AppState {
        session_registry,
        default_session_id: Arc::from(config::DEFAULT_SESSION_ID),
    }))
}
