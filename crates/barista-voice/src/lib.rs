//! LiveKit integration for the barista agent.
//!
//! The voice runtime (LiveKit Agents) owns the media pipeline: audio
//! transport, speech-to-text, text-to-speech and turn detection all happen
//! outside this workspace. What lives here is the thin slice of LiveKit the
//! agent itself needs:
//!
//! - issuing join tokens so the web frontend can enter a room,
//! - sending data packets to every participant of a room,
//! - the [`EventChannel`] capability handle that tool calls receive in
//!   order to announce a saved order, and [`publish_event`], which delivers
//!   an [`barista_types::AgentEvent`] over such a handle on a best-effort
//!   basis.

pub mod channel;
pub mod config;
pub mod error;
pub mod notifier;
pub mod service;

pub use channel::{DataMessage, EventChannel, FanoutChannel, LocalEventChannel, RoomDataChannel};
pub use config::{LiveKitConfig, DEV_LIVEKIT_API_KEY, DEV_LIVEKIT_API_SECRET, DEV_LIVEKIT_URL};
pub use error::VoiceError;
pub use notifier::{publish_event, PublishOutcome};
pub use service::VoiceService;
