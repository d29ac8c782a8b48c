//! Events the agent broadcasts to connected clients.

use crate::OrderRecord;
use serde::{Deserialize, Serialize};

/// Data topic that agent events are published on. The web frontend filters
/// incoming room data packets by this topic.
pub const AGENT_EVENTS_TOPIC: &str = "agent_events";

/// An event announced to every participant of the active session.
///
/// Serialises as `{"type": "order_saved", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AgentEvent {
    /// An order was persisted.
    OrderSaved(OrderRecord),
}

impl AgentEvent {
    /// Returns the `type` string for this event.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OrderSaved(_) => "order_saved",
        }
    }

    /// Serialises the event as compact JSON bytes for a data packet.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
