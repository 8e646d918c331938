//! UseCase: 発言権（floor）の要求・解放・失効
//!
//! 状態遷移そのものは `FloorController` が担い、ここではその結果を
//! 誰に何を通知するかを決める。
//!
//! | 遷移 | 本人 | 他の参加者 |
//! |---|---|---|
//! | Granted | `pttGranted` | `speakerChanged(id)` |
//! | Renewed | `pttGranted` | なし |
//! | Denied | `pttDenied("busy")` | なし |
//! | release | なし | `pttReleased` |
//! | expire | `pttExpired` | `pttReleased` |
//!
//! `BroadcastScope::Everyone` の場合、grant と release の通知は本人にも送る。
//!
//! 遷移と通知はいずれも `ChannelGate` の中で行うので、他のハンドラの遷移と
//! 通知が間に入ることはない。

use std::sync::Arc;

use crate::domain::{
    BroadcastScope, ChannelRepository, ClientId, FloorDecision, HoldToken, MessagePusher,
    Notification, RegistryError,
};

use super::gate::ChannelGate;

pub struct FloorControlUseCase {
    repository: Arc<dyn ChannelRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    gate: ChannelGate,
    scope: BroadcastScope,
}

impl FloorControlUseCase {
    pub fn new(
        repository: Arc<dyn ChannelRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        gate: ChannelGate,
        scope: BroadcastScope,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            gate,
            scope,
        }
    }

    /// floor を要求する
    ///
    /// 未登録の参加者からの要求は `NotRegistered` になり、誰にも通知しない。
    pub async fn request(&self, requester: &ClientId) -> Result<FloorDecision, RegistryError> {
        let _entered = self.gate.enter().await;
        let decision = self.repository.request_floor(requester).await?;

        match &decision {
            FloorDecision::Granted => {
                tracing::info!("Floor granted to '{}'", requester);
                self.push(requester, &Notification::FloorGranted).await;
                self.broadcast_change(
                    requester,
                    &Notification::SpeakerChanged(Some(requester.clone())),
                )
                .await;
            }
            FloorDecision::Renewed => {
                tracing::debug!("Floor renewed for '{}'", requester);
                self.push(requester, &Notification::FloorGranted).await;
            }
            FloorDecision::Denied { holder, reason } => {
                tracing::debug!(
                    "Floor denied to '{}' ({}), held by '{}'",
                    requester,
                    reason.as_str(),
                    holder
                );
                self.push(requester, &Notification::FloorDenied(*reason))
                    .await;
            }
        }

        Ok(decision)
    }

    /// floor を解放する。保持者以外からの解放は何もしない。
    pub async fn release(&self, requester: &ClientId) -> bool {
        let _entered = self.gate.enter().await;
        if !self.repository.release_floor(requester).await {
            tracing::debug!("Ignored release from non-holder '{}'", requester);
            return false;
        }
        tracing::info!("Floor released by '{}'", requester);
        self.broadcast_change(requester, &Notification::FloorReleased)
            .await;
        true
    }

    /// タイマー満了を適用する。古いトークンは無視される。
    pub async fn expire(&self, hold: HoldToken) -> Option<ClientId> {
        let _entered = self.gate.enter().await;
        let prior = self.repository.expire_floor(&hold).await;
        let Some(holder) = prior.as_ref() else {
            tracing::debug!(
                "Ignored stale floor timer for '{}' (generation {})",
                hold.holder,
                hold.generation
            );
            return None;
        };

        tracing::info!("Floor hold of '{}' expired", holder);
        self.push(holder, &Notification::FloorExpired).await;
        let others = self.repository.list_others(holder).await;
        if let Err(e) = self
            .message_pusher
            .broadcast(others, &Notification::FloorReleased)
            .await
        {
            tracing::warn!("Failed to broadcast floor expiry: {}", e);
        }
        prior
    }

    async fn push(&self, client_id: &ClientId, notification: &Notification) {
        if let Err(e) = self.message_pusher.push_to(client_id, notification).await {
            tracing::warn!(
                "Failed to send '{}' to '{}': {}",
                notification.name(),
                client_id,
                e
            );
        }
    }

    async fn broadcast_change(&self, actor: &ClientId, notification: &Notification) {
        let targets = match self.scope {
            BroadcastScope::Others => self.repository.list_others(actor).await,
            BroadcastScope::Everyone => self.repository.get_all_connected_client_ids().await,
        };
        if let Err(e) = self.message_pusher.broadcast(targets, notification).await {
            tracing::warn!("Failed to broadcast '{}': {}", notification.name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DenyReason, MockMessagePusher},
        usecase::{
            ConnectParticipantUseCase,
            test_support::{Harness, Inbox, StallingPusher, last_known_speaker},
        },
    };
    use serde_json::json;
    use tokio::sync::mpsc;
    use walkie_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 各遷移で本人と他の参加者に届く通知
    // - 保持者以外の解放・古いタイマーが何も通知しないこと
    // - BroadcastScope::Everyone で本人にも変更通知が届くこと
    // - 並行したハンドラの遷移と通知が混ざらず、各参加者が最後に知った話者が
    //   実際の保持者と一致すること（送信を途中で止めて再現する）
    // ========================================

    fn create_usecase(harness: &Harness, scope: BroadcastScope) -> FloorControlUseCase {
        FloorControlUseCase::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            harness.gate.clone(),
            scope,
        )
    }

    #[tokio::test]
    async fn test_grant_notifies_requester_and_others() {
        // テスト項目: 付与時、本人に pttGranted、他の参加者に speakerChanged が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;

        // when (操作):
        let decision = usecase.request(&alice).await;

        // then (期待する結果):
        assert_eq!(decision, Ok(FloorDecision::Granted));
        assert_eq!(alice_inbox.drain(), vec![json!({"event": "pttGranted"})]);
        assert_eq!(
            bob_inbox.drain(),
            vec![json!({"event": "speakerChanged", "data": "alice"})]
        );
    }

    #[tokio::test]
    async fn test_busy_request_is_denied() {
        // テスト項目: 保持中に他の参加者が要求すると pttDenied("busy") だけが本人に届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (bob, mut bob_inbox) = harness.join("bob").await;
        usecase.request(&alice).await.unwrap();
        alice_inbox.drain();
        bob_inbox.drain();

        // when (操作):
        let decision = usecase.request(&bob).await;

        // then (期待する結果):
        assert_eq!(
            decision,
            Ok(FloorDecision::Denied {
                holder: alice.clone(),
                reason: DenyReason::Busy,
            })
        );
        assert_eq!(
            bob_inbox.drain(),
            vec![json!({"event": "pttDenied", "data": "busy"})]
        );
        assert!(alice_inbox.drain().is_empty());
        assert_eq!(harness.repository.floor_status().await.holder, Some(alice));
    }

    #[tokio::test]
    async fn test_renewal_does_not_rebroadcast() {
        // テスト項目: 保持者の再要求は pttGranted のみで、他の参加者への通知は重複しない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        usecase.request(&alice).await.unwrap();
        alice_inbox.drain();
        bob_inbox.drain();

        // when (操作):
        let decision = usecase.request(&alice).await;

        // then (期待する結果):
        assert_eq!(decision, Ok(FloorDecision::Renewed));
        assert_eq!(alice_inbox.drain(), vec![json!({"event": "pttGranted"})]);
        assert!(bob_inbox.drain().is_empty());
        assert_eq!(harness.timer.cancelled(), 1);
        assert_eq!(harness.timer.pending(), 1);
    }

    #[tokio::test]
    async fn test_release_broadcasts_to_others() {
        // テスト項目: 保持者の解放で他の参加者に pttReleased が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        usecase.request(&alice).await.unwrap();
        alice_inbox.drain();
        bob_inbox.drain();

        // when (操作):
        let released = usecase.release(&alice).await;

        // then (期待する結果):
        assert!(released);
        assert_eq!(bob_inbox.drain(), vec![json!({"event": "pttReleased"})]);
        assert!(alice_inbox.drain().is_empty());
        assert_eq!(harness.timer.pending(), 0);
    }

    #[tokio::test]
    async fn test_release_by_non_holder_sends_nothing() {
        // テスト項目: 保持者以外の解放は状態を変えず、何も送信しない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_inbox) = harness.join("alice").await;
        let (bob, _bob_inbox) = harness.join("bob").await;
        harness.repository.request_floor(&alice).await.unwrap();

        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().times(0);
        pusher.expect_broadcast().times(0);
        let usecase = FloorControlUseCase::new(
            harness.repository.clone(),
            Arc::new(pusher),
            harness.gate.clone(),
            BroadcastScope::Others,
        );

        // when (操作):
        let released = usecase.release(&bob).await;

        // then (期待する結果):
        assert!(!released);
        assert_eq!(harness.repository.floor_status().await.holder, Some(alice));
    }

    #[tokio::test]
    async fn test_expire_notifies_holder_and_others() {
        // テスト項目: 失効時、保持者に pttExpired、他の参加者に pttReleased が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        usecase.request(&alice).await.unwrap();
        alice_inbox.drain();
        bob_inbox.drain();
        let token = harness.timer.last_token().unwrap();

        // when (操作):
        let expired = usecase.expire(token).await;

        // then (期待する結果):
        assert_eq!(expired, Some(alice));
        assert_eq!(alice_inbox.drain(), vec![json!({"event": "pttExpired"})]);
        assert_eq!(bob_inbox.drain(), vec![json!({"event": "pttReleased"})]);
        assert_eq!(harness.repository.floor_status().await.holder, None);
    }

    #[tokio::test]
    async fn test_expire_with_stale_token_is_ignored() {
        // テスト項目: 更新前のトークンによる失効は無視され、何も通知されない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        usecase.request(&alice).await.unwrap();
        let stale = harness.timer.last_token().unwrap();
        usecase.request(&alice).await.unwrap();
        alice_inbox.drain();
        bob_inbox.drain();

        // when (操作):
        let expired = usecase.expire(stale).await;

        // then (期待する結果):
        assert_eq!(expired, None);
        assert!(alice_inbox.drain().is_empty());
        assert!(bob_inbox.drain().is_empty());
        assert_eq!(harness.repository.floor_status().await.holder, Some(alice));
    }

    #[tokio::test]
    async fn test_everyone_scope_includes_actor() {
        // テスト項目: Everyone スコープでは付与・解放の通知が本人にも届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Everyone);
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;

        // when (操作):
        usecase.request(&alice).await.unwrap();
        usecase.release(&alice).await;

        // then (期待する結果):
        assert_eq!(
            alice_inbox.drain(),
            vec![
                json!({"event": "pttGranted"}),
                json!({"event": "speakerChanged", "data": "alice"}),
                json!({"event": "pttReleased"}),
            ]
        );
        assert_eq!(
            bob_inbox.drain(),
            vec![
                json!({"event": "speakerChanged", "data": "alice"}),
                json!({"event": "pttReleased"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_unregistered_requester_is_rejected() {
        // テスト項目: 未登録の参加者からの要求は NotRegistered になり、floor は変化しない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = create_usecase(&harness, BroadcastScope::Others);
        let ghost = ClientId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = usecase.request(&ghost).await;

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::NotRegistered("ghost".to_string())));
        assert_eq!(harness.repository.floor_status().await.holder, None);
        assert_eq!(harness.timer.pending(), 0);
    }

    fn stalling_usecase(harness: &Harness, pusher: Arc<StallingPusher>) -> Arc<FloorControlUseCase> {
        Arc::new(FloorControlUseCase::new(
            harness.repository.clone(),
            pusher,
            harness.gate.clone(),
            BroadcastScope::Others,
        ))
    }

    async fn let_others_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_request_waits_for_release_notifications() {
        // テスト項目: 解放の通知中に届いた要求は、解放の通知が終わってから処理される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (bob, mut bob_inbox) = harness.join("bob").await;
        let (_carol, mut carol_inbox) = harness.join("carol").await;
        harness.repository.request_floor(&alice).await.unwrap();
        let pusher = Arc::new(StallingPusher::new(harness.pusher.clone(), "pttReleased"));
        let usecase = stalling_usecase(&harness, pusher.clone());

        // when (操作):
        let release = tokio::spawn({
            let usecase = usecase.clone();
            let alice = alice.clone();
            async move { usecase.release(&alice).await }
        });
        pusher.wait_stalled().await;
        let request = tokio::spawn({
            let usecase = usecase.clone();
            let bob = bob.clone();
            async move { usecase.request(&bob).await }
        });
        let_others_run().await;
        let carol_before_open = carol_inbox.drain();
        pusher.open();
        assert!(release.await.unwrap());
        assert_eq!(request.await.unwrap(), Ok(FloorDecision::Granted));

        // then (期待する結果):
        assert!(carol_before_open.is_empty());
        let carol_frames = carol_inbox.drain();
        assert_eq!(
            carol_frames,
            vec![
                json!({"event": "pttReleased"}),
                json!({"event": "speakerChanged", "data": "bob"}),
            ]
        );
        let alice_frames = alice_inbox.drain();
        let holder = harness.repository.floor_status().await.holder;
        assert_eq!(holder, Some(bob.clone()));
        assert_eq!(
            last_known_speaker(&carol_frames),
            Some(Some("bob".to_string()))
        );
        assert_eq!(
            last_known_speaker(&alice_frames),
            Some(Some("bob".to_string()))
        );
        assert_eq!(bob_inbox.drain().last(), Some(&json!({"event": "pttGranted"})));
    }

    #[tokio::test]
    async fn test_request_waits_for_expiry_notifications() {
        // テスト項目: 失効の通知中に届いた要求は、失効の通知が終わってから処理される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_inbox) = harness.join("alice").await;
        let (bob, _bob_inbox) = harness.join("bob").await;
        let (_carol, mut carol_inbox) = harness.join("carol").await;
        harness.repository.request_floor(&alice).await.unwrap();
        let token = harness.timer.last_token().unwrap();
        let pusher = Arc::new(StallingPusher::new(harness.pusher.clone(), "pttReleased"));
        let usecase = stalling_usecase(&harness, pusher.clone());

        // when (操作):
        let expire = tokio::spawn({
            let usecase = usecase.clone();
            async move { usecase.expire(token).await }
        });
        pusher.wait_stalled().await;
        let request = tokio::spawn({
            let usecase = usecase.clone();
            let bob = bob.clone();
            async move { usecase.request(&bob).await }
        });
        let_others_run().await;
        pusher.open();
        assert_eq!(expire.await.unwrap(), Some(alice));
        assert_eq!(request.await.unwrap(), Ok(FloorDecision::Granted));

        // then (期待する結果):
        assert_eq!(
            alice_inbox.drain(),
            vec![
                json!({"event": "pttExpired"}),
                json!({"event": "speakerChanged", "data": "bob"}),
            ]
        );
        let carol_frames = carol_inbox.drain();
        assert_eq!(
            carol_frames,
            vec![
                json!({"event": "pttReleased"}),
                json!({"event": "speakerChanged", "data": "bob"}),
            ]
        );
        let holder = harness.repository.floor_status().await.holder;
        assert_eq!(
            last_known_speaker(&carol_frames),
            Some(holder.map(|id| id.into_string()))
        );
    }

    #[tokio::test]
    async fn test_release_waits_for_late_joiner_announcement() {
        // テスト項目: 遅れて参加した参加者への現在の話者の通知中に解放されても、
        //             その参加者が最後に知る状態は「空き」になる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_inbox) = harness.join("alice").await;
        let (_bob, mut bob_inbox) = harness.join("bob").await;
        harness.repository.request_floor(&alice).await.unwrap();
        let pusher = Arc::new(StallingPusher::new(harness.pusher.clone(), "speakerChanged"));
        let floor_control = stalling_usecase(&harness, pusher.clone());
        let connect = Arc::new(ConnectParticipantUseCase::new(
            harness.repository.clone(),
            pusher.clone(),
            harness.gate.clone(),
            Arc::new(FixedClock::new(1672531200000)),
        ));
        let dave = ClientId::new("dave".to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut dave_inbox = Inbox::from(rx);

        // when (操作):
        let join = tokio::spawn({
            let connect = connect.clone();
            let dave = dave.clone();
            async move { connect.execute(dave, tx).await }
        });
        pusher.wait_stalled().await;
        let release = tokio::spawn({
            let floor_control = floor_control.clone();
            let alice = alice.clone();
            async move { floor_control.release(&alice).await }
        });
        let_others_run().await;
        pusher.open();
        assert!(join.await.unwrap().is_ok());
        assert!(release.await.unwrap());

        // then (期待する結果):
        let dave_frames = dave_inbox.drain();
        assert_eq!(
            dave_frames[2..],
            [
                json!({"event": "speakerChanged", "data": "alice"}),
                json!({"event": "pttReleased"}),
            ]
        );
        assert_eq!(harness.repository.floor_status().await.holder, None);
        assert_eq!(last_known_speaker(&dave_frames), Some(None));
        assert_eq!(last_known_speaker(&bob_inbox.drain()), Some(None));
    }
}
