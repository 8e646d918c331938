//! Inbound commands, one per message type a participant may send.

use serde_json::Value;

use super::relay::SignalRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RequestFloor,
    ReleaseFloor,
    Signal(SignalRequest),
    RegisterMetadata(Value),
    ListPeers,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::RequestFloor => "requestPTT",
            Command::ReleaseFloor => "releasePTT",
            Command::Signal(request) => request.kind.as_str(),
            Command::RegisterMetadata(_) => "registerUser",
            Command::ListPeers => "requestAllClients",
        }
    }
}
