//! Outbound notifications
//!
//! What the core asks the transport to deliver. Wire encoding lives in
//! `infrastructure::dto`.

use super::{floor::DenyReason, relay::RelayMessage, value_object::ClientId};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Identity assigned to the recipient at connect time
    AssignedId(ClientId),
    /// Everyone else currently connected
    Peers(Vec<ClientId>),
    PeerJoined(ClientId),
    PeerLeft(ClientId),
    /// Floor granted or renewed to the recipient
    FloorGranted,
    FloorDenied(DenyReason),
    /// Floor is free again
    FloorReleased,
    /// Recipient's own hold timed out
    FloorExpired,
    /// Current holder (`None` when the floor is idle)
    SpeakerChanged(Option<ClientId>),
    Signal(RelayMessage),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::AssignedId(_) => "yourId",
            Notification::Peers(_) => "allClients",
            Notification::PeerJoined(_) => "newClient",
            Notification::PeerLeft(_) => "clientDisconnected",
            Notification::FloorGranted => "pttGranted",
            Notification::FloorDenied(_) => "pttDenied",
            Notification::FloorReleased => "pttReleased",
            Notification::FloorExpired => "pttExpired",
            Notification::SpeakerChanged(_) => "speakerChanged",
            Notification::Signal(message) => message.kind.as_str(),
        }
    }
}

/// Who hears about floor changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BroadcastScope {
    /// Every connected participant except the one whose action caused the change
    #[default]
    Others,
    /// Every connected participant, including the actor
    Everyone,
}
