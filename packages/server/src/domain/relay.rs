//! Signaling Relay
//!
//! Stateless validation of addressed negotiation messages (SDP offers/answers
//! and ICE candidates). Payloads are opaque and forwarded untouched.

use serde_json::Value;

use super::{error::RelayError, registry::Registry, value_object::ClientId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        }
    }

    /// Name of the wire field carrying the payload for this kind.
    pub fn payload_field(&self) -> &'static str {
        match self {
            SignalKind::Offer | SignalKind::Answer => "sdp",
            SignalKind::IceCandidate => "candidate",
        }
    }
}

/// An inbound relay request as received from the sender, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRequest {
    pub kind: SignalKind,
    pub to: Option<String>,
    pub payload: Option<Value>,
}

/// A validated envelope ready for delivery to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayMessage {
    pub kind: SignalKind,
    pub sender: ClientId,
    pub target: ClientId,
    pub payload: Value,
}

/// Validate `request` against the current registry.
///
/// The target is checked first, then the payload.
pub fn route(
    registry: &Registry,
    sender: &ClientId,
    request: SignalRequest,
) -> Result<RelayMessage, RelayError> {
    let kind = request.kind;

    let raw_target = request
        .to
        .filter(|to| !to.trim().is_empty())
        .ok_or(RelayError::MalformedPayload {
            kind: kind.as_str(),
            field: "to",
        })?;
    let target = ClientId::new(raw_target.clone())
        .ok()
        .filter(|target| registry.contains(target))
        .ok_or(RelayError::UnknownTarget(raw_target))?;

    let payload = request
        .payload
        .filter(|payload| !is_empty_payload(payload))
        .ok_or(RelayError::MalformedPayload {
            kind: kind.as_str(),
            field: kind.payload_field(),
        })?;

    Ok(RelayMessage {
        kind,
        sender: sender.clone(),
        target,
        payload,
    })
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
