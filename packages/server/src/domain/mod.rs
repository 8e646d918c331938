//! Domain layer: the talk channel's state machines and the seams the
//! outer layers implement.

pub mod channel;
pub mod command;
pub mod entity;
pub mod error;
pub mod floor;
pub mod message_pusher;
pub mod notification;
pub mod registry;
pub mod relay;
pub mod repository;
pub mod value_object;

pub use channel::Channel;
pub use command::Command;
pub use entity::Participant;
pub use error::{MessagePushError, RegistryError, RelayError, ValueObjectError};
pub use floor::{
    ArmedTimer, DenyReason, FloorController, FloorDecision, FloorState, FloorStatus, FloorTimer,
    HoldToken,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::{BroadcastScope, Notification};
pub use registry::Registry;
pub use relay::{RelayMessage, SignalKind, SignalRequest};
pub use repository::ChannelRepository;
pub use value_object::{ClientId, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
