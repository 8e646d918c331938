//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.
//! `data` is absent for events that carry nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events sent by a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename = "requestPTT")]
    RequestPtt,
    #[serde(rename = "releasePTT")]
    ReleasePtt,
    Offer(SessionDescriptionRequest),
    Answer(SessionDescriptionRequest),
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidateRequest),
    RegisterUser(Value),
    RequestAllClients,
}

/// `offer` / `answer` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptionRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub sdp: Option<Value>,
}

/// `ice-candidate` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCandidateRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub candidate: Option<Value>,
}

/// Events sent to a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// `clientId` is accepted when decoding
    #[serde(alias = "clientId")]
    YourId(String),
    AllClients(Vec<String>),
    NewClient(String),
    ClientDisconnected(String),
    PttGranted,
    PttDenied(String),
    PttReleased,
    PttExpired,
    SpeakerChanged(Option<String>),
    Offer(SessionDescriptionRelay),
    Answer(SessionDescriptionRelay),
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidateRelay),
}

/// Relayed `offer` / `answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptionRelay {
    pub from: String,
    pub sdp: Value,
}

/// Relayed `ice-candidate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCandidateRelay {
    pub from: String,
    pub candidate: Value,
}
