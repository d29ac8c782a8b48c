//! Barista server binary.
//!
//! Loads `.env.local` and the TOML configuration, starts structured
//! logging, and serves the agent's HTTP surface until SIGTERM/SIGINT.

use barista_agent::BaristaAgent;
use barista_orders::OrderStore;
use barista_server::{app, config, AppState};
use barista_voice::{LocalEventChannel, VoiceService};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const ENV_FILE: &str = ".env.local";

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("BARISTA_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    // Credentials for the voice runtime usually live here; absence is fine.
    let env_loaded = dotenvy::from_filename(ENV_FILE).is_ok();

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("barista.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        env_file = ENV_FILE,
        env_file_loaded = env_loaded,
        "resolved startup configuration"
    );

    let voice_service = Arc::new(VoiceService::new(config.livekit.clone()));
    if voice_service.is_enabled() {
        tracing::info!(url = %voice_service.get_url(), "LiveKit enabled");
    } else {
        tracing::warn!("LiveKit URL not set; connection details and room events are disabled");
    }

    let store = OrderStore::new(&config.orders.dir);
    tracing::info!(dir = %store.dir().display(), "order store ready");

    let state = AppState {
        agent: Arc::new(BaristaAgent::new(store)),
        voice_service,
        local_events: LocalEventChannel::default(),
        frontend_dir: config.frontend.dir.clone(),
    };

    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting barista server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("barista server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
