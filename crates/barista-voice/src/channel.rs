//! Publish-only channels that agent events are delivered over.
//!
//! A tool call receives an [`EventChannel`] handle for the session it runs
//! in instead of reaching for a global room object. The handle may point at
//! a LiveKit room, at the in-process broadcast that feeds the local event
//! stream, or at several of these through [`FanoutChannel`].

use crate::error::VoiceError;
use crate::service::VoiceService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default capacity for the local data broadcast channel.
pub const DEFAULT_LOCAL_BROADCAST_CAPACITY: usize = 256;

/// A destination for serialised agent events.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Short human-readable description, used in log lines.
    fn describe(&self) -> String;

    /// Delivers `payload` on `topic` to every listener of this channel.
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), VoiceError>;
}

/// Sends data packets to all participants of one LiveKit room.
#[derive(Debug, Clone)]
pub struct RoomDataChannel {
    service: Arc<VoiceService>,
    room: String,
}

impl RoomDataChannel {
    pub fn new(service: Arc<VoiceService>, room: impl Into<String>) -> Self {
        Self {
            service,
            room: room.into(),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }
}

#[async_trait]
impl EventChannel for RoomDataChannel {
    fn describe(&self) -> String {
        format!("livekit room '{}'", self.room)
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), VoiceError> {
        self.service
            .send_data(&self.room, topic, payload.to_vec())
            .await
    }
}

/// A data packet as seen by in-process subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Broadcasts data packets to in-process subscribers, such as the
/// server-sent events stream.
#[derive(Debug, Clone)]
pub struct LocalEventChannel {
    tx: broadcast::Sender<DataMessage>,
}

impl LocalEventChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LocalEventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_BROADCAST_CAPACITY)
    }
}

#[async_trait]
impl EventChannel for LocalEventChannel {
    fn describe(&self) -> String {
        "local event stream".to_string()
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), VoiceError> {
        let message = DataMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        };
        self.tx
            .send(message)
            .map(|_| ())
            .map_err(|_| VoiceError::NoListeners(self.describe()))
    }
}

/// Delivers every packet to each of several channels.
///
/// Succeeds when at least one target accepted the packet; failures of the
/// other targets are logged as warnings.
#[derive(Clone, Default)]
pub struct FanoutChannel {
    targets: Vec<Arc<dyn EventChannel>>,
}

impl FanoutChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: Arc<dyn EventChannel>) -> Self {
        self.targets.push(target);
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[async_trait]
impl EventChannel for FanoutChannel {
    fn describe(&self) -> String {
        let names: Vec<String> = self.targets.iter().map(|t| t.describe()).collect();
        format!("fanout [{}]", names.join(", "))
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), VoiceError> {
        let mut delivered = 0usize;
        let mut last_error = None;

        for target in &self.targets {
            match target.publish(topic, payload).await {
                Ok(()) => delivered += 1,
                // Nobody listening locally is the normal idle state.
                Err(e @ VoiceError::NoListeners(_)) => {
                    tracing::debug!(
                        target = %target.describe(),
                        topic,
                        "fanout target has no listeners: {}",
                        e
                    );
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::warn!(
                        target = %target.describe(),
                        topic,
                        "fanout target rejected event: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        match (delivered, last_error) {
            (0, Some(e)) => Err(e),
            (0, None) => Err(VoiceError::ChannelUnavailable(
                "fanout has no targets".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
