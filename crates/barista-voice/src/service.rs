use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{RoomClient, SendDataOptions};
use livekit_protocol::data_packet::Kind as DataPacketKind;
use std::time::Duration;

#[derive(Debug)]
pub struct VoiceService {
    config: LiveKitConfig,
    room_client: RoomClient,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    /// Issues a join token that lets a participant enter `room_name`, publish
    /// and subscribe to audio, and exchange data packets with the agent.
    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::Config("LiveKit URL is not configured".to_string()));
        }

        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }

    /// Sends a reliable data packet on `topic` to every participant in `room`.
    pub async fn send_data(
        &self,
        room: &str,
        topic: &str,
        payload: Vec<u8>,
    ) -> Result<(), VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::ChannelUnavailable(format!(
                "LiveKit is not configured, cannot reach room '{room}'"
            )));
        }

        let options = SendDataOptions {
            kind: DataPacketKind::Reliable,
            topic: Some(topic.to_string()),
            ..Default::default()
        };

        self.room_client
            .send_data(room, payload, options)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }
}
