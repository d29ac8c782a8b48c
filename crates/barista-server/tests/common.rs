use barista_agent::BaristaAgent;
use barista_orders::OrderStore;
use barista_server::AppState;
use barista_voice::{LiveKitConfig, LocalEventChannel, VoiceService};
use std::path::Path;
use std::sync::Arc;

/// Builds server state around an order directory and LiveKit settings.
#[allow(dead_code)]
pub fn test_state(orders_dir: &Path, livekit: LiveKitConfig) -> AppState {
    AppState {
        agent: Arc::new(BaristaAgent::new(OrderStore::new(orders_dir))),
        voice_service: Arc::new(VoiceService::new(livekit)),
        local_events: LocalEventChannel::default(),
        frontend_dir: None,
    }
}
