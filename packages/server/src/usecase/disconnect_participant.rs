//! UseCase: 参加者切断処理
//!
//! 切断は必ず次の順で行う。どの段階で ID が既に存在しなくても残りを続ける。
//!
//! 1. 切断した参加者が floor を保持していれば解放し、残りの参加者に通知
//! 2. Registry と MessagePusher から削除
//! 3. 残りの参加者に leave を通知
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - floor 保持者の切断（解放通知 → leave 通知の順）
//! - エッジケース：最後の参加者の切断、二重の切断通知

use std::sync::Arc;

use crate::domain::{ChannelRepository, ClientId, MessagePusher, Notification};

use super::gate::ChannelGate;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn ChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: ChannelGate,
}

impl DisconnectParticipantUseCase {
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

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 参加者が実際に登録されていた場合は `true`
    pub async fn execute(&self, client_id: &ClientId) -> bool {
        let _entered = self.gate.enter().await;

        // 1. floor の解放（切断した本人には通知しない）
        if self.repository.release_floor_on_disconnect(client_id).await {
            tracing::info!("Floor released because holder '{}' disconnected", client_id);
            let others = self.repository.list_others(client_id).await;
            if let Err(e) = self
                .message_pusher
                .broadcast(others, &Notification::FloorReleased)
                .await
            {
                tracing::warn!("Failed to broadcast floor release: {}", e);
            }
        }

        // 2. Registry と MessagePusher から削除
        let removed = self.repository.remove_participant(client_id).await;
        self.message_pusher.unregister_client(client_id).await;

        let Some(participant) = removed else {
            tracing::debug!("Client '{}' was already unregistered", client_id);
            return false;
        };

        // 3. 残りの参加者に通知
        let remaining = self.repository.get_all_connected_client_ids().await;
        if let Err(e) = self
            .message_pusher
            .broadcast(remaining, &Notification::PeerLeft(participant.id))
            .await
        {
            tracing::warn!("Failed to broadcast leave of '{}': {}", client_id, e);
        }

        true
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_participants(&self) -> usize {
        self.repository.count_connected_clients().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Harness;
    use serde_json::json;

    fn create_usecase(harness: &Harness) -> DisconnectParticipantUseCase {
        DisconnectParticipantUseCase::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            harness.gate.clone(),
        )
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 参加者が切断され、残りの参加者に clientDisconnected が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, _alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        let (_carol, mut carol_inbox) = harness.join("carol").await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(usecase.count_remaining_participants().await, 2);
        let expected = vec![json!({"event": "clientDisconnected", "data": "alice"})];
        assert_eq!(bob_inbox.drain(), expected);
        assert_eq!(carol_inbox.drain(), expected);
    }

    #[tokio::test]
    async fn test_disconnect_holder_releases_floor_first() {
        // テスト項目: floor 保持者が切断すると pttReleased → clientDisconnected の順で通知され、タイマーも取り消される
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        harness.repository.request_floor(&alice).await.unwrap();

        // when (操作):
        usecase.execute(&alice).await;

        // then (期待する結果):
        assert_eq!(
            bob_inbox.drain(),
            vec![
                json!({"event": "pttReleased"}),
                json!({"event": "clientDisconnected", "data": "alice"}),
            ]
        );
        // 切断した本人には何も送らない
        assert!(alice_inbox.drain().is_empty());
        assert_eq!(harness.repository.floor_status().await.holder, None);
        assert_eq!(harness.timer.pending(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_non_holder_keeps_floor() {
        // テスト項目: 保持者以外の切断では floor は変化しない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, _alice_inbox) = harness.join("alice").await;
        let (bob, _bob_inbox) = harness.join("bob").await;
        harness.repository.request_floor(&alice).await.unwrap();

        // when (操作):
        usecase.execute(&bob).await;

        // then (期待する結果):
        assert_eq!(harness.repository.floor_status().await.holder, Some(alice));
        assert_eq!(harness.timer.pending(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_last_participant() {
        // テスト項目: 最後の参加者が切断した場合、通知対象は空で参加者数は 0
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, _alice_inbox) = harness.join("alice").await;

        // when (操作):
        let removed = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(removed);
        assert_eq!(usecase.count_remaining_participants().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 二重の切断通知は二度目が何もしない（通知も重複しない）
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness);
        let (alice, _alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        usecase.execute(&alice).await;
        bob_inbox.drain();

        // when (操作):
        let removed_again = usecase.execute(&alice).await;

        // then (期待する結果):
        assert!(!removed_again);
        assert!(bob_inbox.drain().is_empty());
        assert_eq!(usecase.count_remaining_participants().await, 1);
    }
}
