//! MessagePusher trait 定義
//!
//! 参加者へのメッセージ送信（通知）のインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, notification::Notification, value_object::ClientId};

/// 接続ごとの送信キュー。エンコード済みのフレームを流す。
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 送信先としてクライアントを登録
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// 送信先からクライアントを削除（存在しなければ何もしない）
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        client_id: &ClientId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
