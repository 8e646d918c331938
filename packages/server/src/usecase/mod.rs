//! UseCase 層
//!
//! 一つの操作につき一つのユースケース。いずれも `ChannelRepository` と
//! `MessagePusher` の trait object だけに依存します。
//! 通知を伴うユースケースは共通の `ChannelGate` を受け取ります。

pub mod connect_participant;
pub mod disconnect_participant;
pub mod dispatch;
pub mod error;
pub mod floor_control;
pub mod gate;
pub mod get_channel_status;
pub mod register_metadata;
pub mod relay_signal;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use dispatch::EventDispatcher;
pub use error::{ConnectError, RegisterMetadataError};
pub use floor_control::FloorControlUseCase;
pub use gate::ChannelGate;
pub use get_channel_status::GetChannelStatusUseCase;
pub use register_metadata::RegisterMetadataUseCase;
pub use relay_signal::RelaySignalUseCase;
