//! Conversion logic between DTOs and domain types.

use walkie_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    Command, FloorStatus, Notification, Participant, SignalKind, SignalRequest,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientEvent> for Command {
    fn from(event: dto::ClientEvent) -> Self {
        match event {
            dto::ClientEvent::RequestPtt => Command::RequestFloor,
            dto::ClientEvent::ReleasePtt => Command::ReleaseFloor,
            dto::ClientEvent::Offer(body) => Command::Signal(SignalRequest {
                kind: SignalKind::Offer,
                to: body.to,
                payload: body.sdp,
            }),
            dto::ClientEvent::Answer(body) => Command::Signal(SignalRequest {
                kind: SignalKind::Answer,
                to: body.to,
                payload: body.sdp,
            }),
            dto::ClientEvent::IceCandidate(body) => Command::Signal(SignalRequest {
                kind: SignalKind::IceCandidate,
                to: body.to,
                payload: body.candidate,
            }),
            dto::ClientEvent::RegisterUser(metadata) => Command::RegisterMetadata(metadata),
            dto::ClientEvent::RequestAllClients => Command::ListPeers,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::AssignedId(id) => dto::ServerEvent::YourId(id.to_string()),
            Notification::Peers(ids) => {
                dto::ServerEvent::AllClients(ids.iter().map(ToString::to_string).collect())
            }
            Notification::PeerJoined(id) => dto::ServerEvent::NewClient(id.to_string()),
            Notification::PeerLeft(id) => dto::ServerEvent::ClientDisconnected(id.to_string()),
            Notification::FloorGranted => dto::ServerEvent::PttGranted,
            Notification::FloorDenied(reason) => {
                dto::ServerEvent::PttDenied(reason.as_str().to_string())
            }
            Notification::FloorReleased => dto::ServerEvent::PttReleased,
            Notification::FloorExpired => dto::ServerEvent::PttExpired,
            Notification::SpeakerChanged(holder) => {
                dto::ServerEvent::SpeakerChanged(holder.as_ref().map(ToString::to_string))
            }
            Notification::Signal(message) => {
                let from = message.sender.to_string();
                let payload = message.payload.clone();
                match message.kind {
                    SignalKind::Offer => dto::ServerEvent::Offer(dto::SessionDescriptionRelay {
                        from,
                        sdp: payload,
                    }),
                    SignalKind::Answer => {
                        dto::ServerEvent::Answer(dto::SessionDescriptionRelay { from, sdp: payload })
                    }
                    SignalKind::IceCandidate => {
                        dto::ServerEvent::IceCandidate(dto::IceCandidateRelay {
                            from,
                            candidate: payload,
                        })
                    }
                }
            }
        }
    }
}

impl From<Participant> for http::ParticipantDetailDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.into_string(),
            connected_at: timestamp_to_rfc3339(model.connected_at.value()),
            metadata: model.metadata,
        }
    }
}

impl http::ChannelStatusDto {
    pub fn new(floor: FloorStatus, participants: Vec<Participant>) -> Self {
        Self {
            participants: participants.len(),
            speaker: floor.holder.map(|holder| holder.into_string()),
            floor_remaining_ms: floor
                .remaining
                .map(|remaining| u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX)),
            clients: participants.into_iter().map(Into::into).collect(),
        }
    }
}
