//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続直後の通知順序（yourId → allClients → newClient → speakerChanged）
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、既存参加者がいる場合
//! - 遅れて参加した参加者への現在の話者の通知
//! - 異常系：重複した client_id での接続試行

use std::sync::Arc;

use walkie_shared::time::Clock;

use crate::domain::{
    ChannelRepository, ClientId, MessagePusher, Notification, Participant, PusherChannel,
    RegistryError, Timestamp,
};

use super::{error::ConnectError, gate::ChannelGate};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn ChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: ChannelGate,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: ChannelGate,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate,
            clock,
        }
    }

    /// 参加者接続を実行
    ///
    /// Registry に登録し、送信キューを MessagePusher に登録したうえで
    /// 接続時の通知を送る。登録から通知までは一つの `ChannelGate` 区間で行う。
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 登録された参加者
    /// * `Err(ConnectError)` - 同じ ID が既に接続中
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
    ) -> Result<Participant, ConnectError> {
        let participant = Participant::new(
            client_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let _entered = self.gate.enter().await;

        // 1. Registry に登録（重複チェックは Registry 側）
        self.repository
            .add_participant(participant.clone())
            .await
            .map_err(|e| match e {
                RegistryError::DuplicateId(id) => ConnectError::DuplicateClientId(id),
                other => other.into(),
            })?;

        // 2. 送信先として登録
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await;

        // 3. 接続時の通知
        self.announce(&client_id).await;

        Ok(participant)
    }

    /// 本人に ID と参加者一覧を送り、他の参加者に join を知らせる。
    /// floor が保持中なら現在の話者も本人に送る。
    async fn announce(&self, client_id: &ClientId) {
        if let Err(e) = self
            .message_pusher
            .push_to(client_id, &Notification::AssignedId(client_id.clone()))
            .await
        {
            tracing::warn!("Failed to send assigned id to '{}': {}", client_id, e);
        }

        let others = self.repository.list_others(client_id).await;
        if let Err(e) = self
            .message_pusher
            .push_to(client_id, &Notification::Peers(others.clone()))
            .await
        {
            tracing::warn!("Failed to send peer list to '{}': {}", client_id, e);
        }

        if let Err(e) = self
            .message_pusher
            .broadcast(others, &Notification::PeerJoined(client_id.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast join of '{}': {}", client_id, e);
        }

        if let Some(holder) = self.repository.floor_status().await.holder {
            if let Err(e) = self
                .message_pusher
                .push_to(client_id, &Notification::SpeakerChanged(Some(holder)))
                .await
            {
                tracing::warn!("Failed to send current speaker to '{}': {}", client_id, e);
            }
        }
    }
}
