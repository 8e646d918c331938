//! Channel aggregate
//!
//! The process-wide talk channel: the Connection Registry together with the
//! single Floor Controller. Keeping both behind one owner is what lets every
//! transition check "the holder is a registered participant" atomically.

use serde_json::Value;
use tokio::time::Instant;

use super::{
    entity::Participant,
    error::{RegistryError, RelayError},
    floor::{FloorController, FloorDecision, FloorStatus, HoldToken},
    registry::Registry,
    relay::{self, RelayMessage, SignalRequest},
    value_object::ClientId,
};

#[derive(Debug)]
pub struct Channel {
    registry: Registry,
    floor: FloorController,
}

impl Channel {
    pub fn new(floor: FloorController) -> Self {
        Self {
            registry: Registry::new(),
            floor,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn floor(&self) -> &FloorController {
        &self.floor
    }

    pub fn register(&mut self, participant: Participant) -> Result<(), RegistryError> {
        self.registry.register(participant)
    }

    /// Remove a participant. If the floor is somehow still held by it, the
    /// hold is dropped as well so the holder never outlives its registration.
    pub fn unregister(&mut self, id: &ClientId) -> Option<Participant> {
        if self.floor.on_disconnect(id) {
            tracing::warn!(
                "Floor was still held by '{}' at unregister time; released",
                id
            );
        }
        self.registry.unregister(id)
    }

    pub fn attach_metadata(&mut self, id: &ClientId, metadata: Value) -> Result<(), RegistryError> {
        self.registry.attach_metadata(id, metadata)
    }

    /// Floor request. Unregistered requesters are refused before the state
    /// machine sees them.
    pub fn request_floor(
        &mut self,
        requester: &ClientId,
        now: Instant,
    ) -> Result<FloorDecision, RegistryError> {
        if !self.registry.contains(requester) {
            return Err(RegistryError::NotRegistered(requester.to_string()));
        }
        Ok(self.floor.request(requester, now))
    }

    pub fn release_floor(&mut self, requester: &ClientId) -> bool {
        self.floor.release(requester)
    }

    pub fn expire_floor(&mut self, hold: &HoldToken) -> Option<ClientId> {
        self.floor.on_timeout(hold)
    }

    pub fn release_floor_on_disconnect(&mut self, id: &ClientId) -> bool {
        self.floor.on_disconnect(id)
    }

    pub fn floor_status(&self, now: Instant) -> FloorStatus {
        self.floor.status(now)
    }

    pub fn route_signal(
        &self,
        sender: &ClientId,
        request: SignalRequest,
    ) -> Result<RelayMessage, RelayError> {
        relay::route(&self.registry, sender, request)
    }

    /// `holder ∈ registry` whenever the floor is held.
    pub fn holder_is_registered(&self) -> bool {
        self.floor
            .holder()
            .is_none_or(|holder| self.registry.contains(holder))
    }
}
