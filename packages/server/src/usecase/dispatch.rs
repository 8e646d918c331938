//! 受信コマンドの振り分け
//!
//! WebSocket から届いたメッセージは全てここを通る。どのコマンドも失敗は
//! ログに残すだけで、接続は維持する。

use std::sync::Arc;

use crate::domain::{ChannelRepository, ClientId, Command, MessagePusher, Notification};

use super::{ChannelGate, FloorControlUseCase, RegisterMetadataUseCase, RelaySignalUseCase};

pub struct EventDispatcher {
    floor_control: Arc<FloorControlUseCase>,
    relay_signal: Arc<RelaySignalUseCase>,
    register_metadata: Arc<RegisterMetadataUseCase>,
    repository: Arc<dyn ChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: ChannelGate,
}

impl EventDispatcher {
    pub fn new(
        floor_control: Arc<FloorControlUseCase>,
        relay_signal: Arc<RelaySignalUseCase>,
        register_metadata: Arc<RegisterMetadataUseCase>,
        repository: Arc<dyn ChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: ChannelGate,
    ) -> Self {
        Self {
            floor_control,
            relay_signal,
            register_metadata,
            repository,
            message_pusher,
            gate,
        }
    }

    pub async fn dispatch(&self, sender: &ClientId, command: Command) {
        tracing::debug!("'{}' sent {}", sender, command.name());

        match command {
            Command::RequestFloor => {
                if let Err(e) = self.floor_control.request(sender).await {
                    tracing::warn!("Floor request from '{}' rejected: {}", sender, e);
                }
            }
            Command::ReleaseFloor => {
                self.floor_control.release(sender).await;
            }
            Command::Signal(request) => {
                // 破棄の理由は relay 側でログ済み
                let _ = self.relay_signal.execute(sender, request).await;
            }
            Command::RegisterMetadata(metadata) => {
                if let Err(e) = self.register_metadata.execute(sender, metadata).await {
                    tracing::warn!("registerUser from '{}' rejected: {}", sender, e);
                }
            }
            Command::ListPeers => {
                let _entered = self.gate.enter().await;
                let others = self.repository.list_others(sender).await;
                if let Err(e) = self
                    .message_pusher
                    .push_to(sender, &Notification::Peers(others))
                    .await
                {
                    tracing::warn!("Failed to send peer list to '{}': {}", sender, e);
                }
            }
        }
    }
}
