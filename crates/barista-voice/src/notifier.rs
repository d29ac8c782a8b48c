//! Best-effort delivery of agent events.

use crate::channel::EventChannel;
use barista_types::{AgentEvent, AGENT_EVENTS_TOPIC};
use tracing::{info, warn};

/// What happened to a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The channel accepted the event.
    Delivered,
    /// No channel was available for this session.
    Skipped,
    /// The channel rejected the event, or it could not be serialised.
    Failed,
}

/// Announces `event` on [`AGENT_EVENTS_TOPIC`] over `channel`.
///
/// Never fails: a missing channel or a delivery error is logged as a
/// warning and reported through the returned outcome only.
pub async fn publish_event(channel: Option<&dyn EventChannel>, event: &AgentEvent) -> PublishOutcome {
    let Some(channel) = channel else {
        warn!(
            event_type = event.event_type(),
            "cannot publish event: no event channel available"
        );
        return PublishOutcome::Skipped;
    };

    let payload = match event.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(event_type = event.event_type(), "failed to serialise event: {}", e);
            return PublishOutcome::Failed;
        }
    };

    match channel.publish(AGENT_EVENTS_TOPIC, &payload).await {
        Ok(()) => {
            info!(
                event_type = event.event_type(),
                channel = %channel.describe(),
                bytes = payload.len(),
                "published agent event"
            );
            PublishOutcome::Delivered
        }
        Err(e) => {
            warn!(
                event_type = event.event_type(),
                channel = %channel.describe(),
                "failed to publish agent event: {}",
                e
            );
            PublishOutcome::Failed
        }
    }
}
