//! UseCase: WebRTC シグナリングの中継
//!
//! 宛先が未登録・ペイロードが空のメッセージはログに残して破棄する。
//! 送信者にはエラーを返さない。

use std::sync::Arc;

use crate::domain::{
    ChannelRepository, ClientId, MessagePusher, Notification, RelayError, SignalRequest,
};

use super::gate::ChannelGate;

pub struct RelaySignalUseCase {
    repository: Arc<dyn ChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: ChannelGate,
}

impl RelaySignalUseCase {
    pub fn new(
        repository: Arc<dyn ChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: ChannelGate,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate,
        }
    }

    /// `request` を宛先の接続にだけ届ける
    pub async fn execute(
        &self,
        sender: &ClientId,
        request: SignalRequest,
    ) -> Result<(), RelayError> {
        let kind = request.kind;
        let _entered = self.gate.enter().await;
        let message = match self.repository.route_signal(sender, request).await {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!("Dropped {} from '{}': {}", kind.as_str(), sender, e);
                return Err(e);
            }
        };

        let target = message.target.clone();
        match self
            .message_pusher
            .push_to(&target, &Notification::Signal(message))
            .await
        {
            Ok(()) => tracing::debug!("Relayed {} from '{}' to '{}'", kind.as_str(), sender, target),
            // 宛先がちょうど切断された場合
            Err(e) => tracing::debug!("Dropped {} to '{}': {}", kind.as_str(), target, e),
        }
        Ok(())
    }
}
