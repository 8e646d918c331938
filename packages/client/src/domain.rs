//! Domain logic for client-side operations.
//!
//! Pure functions and state with no I/O, so they can be tested directly.

use std::{collections::BTreeSet, time::Duration};

use walkie_server::infrastructure::dto::websocket::ServerEvent;

use crate::error::ClientError;

/// Reconnection limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

impl ReconnectPolicy {
    /// Check if the client should attempt to reconnect.
    ///
    /// `current_attempt` counts reconnections already made (0-indexed).
    pub fn should_attempt_reconnect(&self, error: &ClientError, current_attempt: u32) -> bool {
        if should_exit_immediately(error) {
            return false;
        }
        current_attempt < self.max_attempts
    }
}

/// Errors that retrying cannot fix.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidUrl(_) | ClientError::ReconnectExhausted(_)
    )
}

/// What this client currently knows about the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelView {
    pub my_id: Option<String>,
    pub peers: BTreeSet<String>,
    pub speaker: Option<String>,
}

impl ChannelView {
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::YourId(id) => self.my_id = Some(id.clone()),
            ServerEvent::AllClients(ids) => self.peers = ids.iter().cloned().collect(),
            ServerEvent::NewClient(id) => {
                self.peers.insert(id.clone());
            }
            ServerEvent::ClientDisconnected(id) => {
                self.peers.remove(id);
                if self.speaker.as_ref() == Some(id) {
                    self.speaker = None;
                }
            }
            ServerEvent::PttGranted => self.speaker = self.my_id.clone(),
            ServerEvent::PttReleased | ServerEvent::PttExpired => self.speaker = None,
            ServerEvent::SpeakerChanged(speaker) => self.speaker = speaker.clone(),
            ServerEvent::PttDenied(_)
            | ServerEvent::Offer(_)
            | ServerEvent::Answer(_)
            | ServerEvent::IceCandidate(_) => {}
        }
    }

    pub fn is_me(&self, id: &str) -> bool {
        self.my_id.as_deref() == Some(id)
    }

    pub fn is_talking(&self) -> bool {
        self.speaker.is_some() && self.speaker == self.my_id
    }
}
