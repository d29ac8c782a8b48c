//! HTTP surface of the barista agent.
//!
//! The voice runtime calls the agent's tools through this server, the web
//! frontend fetches its LiveKit connection details here, and any local
//! listener can follow saved orders through a server-sent events stream.

pub mod api;
pub mod api_sse;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use barista_agent::BaristaAgent;
use barista_voice::{LocalEventChannel, VoiceService};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The barista's tools and their order store.
    pub agent: Arc<BaristaAgent>,
    /// LiveKit access for join tokens and room data packets.
    pub voice_service: Arc<VoiceService>,
    /// In-process broadcast of agent events, feeding `/events/orders`.
    pub local_events: LocalEventChannel,
    /// Built frontend to serve, if any.
    pub frontend_dir: Option<String>,
}

/// Maximum request body size (256 KiB). Tool arguments are small.
const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/agent", get(api::get_agent_handler))
        .route("/api/agent/tools/{toolName}", post(api::call_tool_handler))
        .route(
            "/api/connection-details",
            get(api::connection_details_handler),
        )
        .route("/api/orders/latest", get(api::latest_order_handler))
        .route("/events/orders", get(api_sse::get_order_stream_handler));

    let router = match state.frontend_dir.as_deref() {
        Some(dir) if Path::new(dir).join("index.html").exists() => {
            tracing::info!(path = %dir, "serving frontend static files");
            let index = Path::new(dir).join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        Some(dir) => {
            tracing::info!(path = %dir, "frontend directory not found, skipping static file serving");
            router
        }
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
