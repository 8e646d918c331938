//! Repository trait 定義
//!
//! ドメイン層が必要とするチャンネル状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは一つの状態遷移を表し、実装はそれを不可分に実行しなければならない。

use async_trait::async_trait;
use serde_json::Value;

use super::{
    ClientId, FloorDecision, FloorStatus, HoldToken, Participant, RegistryError, RelayError,
    RelayMessage, SignalRequest,
};

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// 参加者を登録
    async fn add_participant(&self, participant: Participant) -> Result<(), RegistryError>;

    /// 参加者を削除（存在しなければ `None`）
    async fn remove_participant(&self, client_id: &ClientId) -> Option<Participant>;

    async fn contains(&self, client_id: &ClientId) -> bool;

    /// 指定したクライアント以外の接続中クライアント ID
    async fn list_others(&self, client_id: &ClientId) -> Vec<ClientId>;

    /// 接続中の全てのクライアント ID を取得
    async fn get_all_connected_client_ids(&self) -> Vec<ClientId>;

    /// 接続中のクライアント数を取得
    async fn count_connected_clients(&self) -> usize;

    /// 参加者リストを取得（接続時刻順）
    async fn get_participants(&self) -> Vec<Participant>;

    async fn attach_metadata(
        &self,
        client_id: &ClientId,
        metadata: Value,
    ) -> Result<(), RegistryError>;

    async fn request_floor(&self, client_id: &ClientId) -> Result<FloorDecision, RegistryError>;

    async fn release_floor(&self, client_id: &ClientId) -> bool;

    /// タイマー満了を適用。実際に失効した場合は直前の保持者を返す
    async fn expire_floor(&self, hold: &HoldToken) -> Option<ClientId>;

    async fn release_floor_on_disconnect(&self, client_id: &ClientId) -> bool;

    async fn floor_status(&self) -> FloorStatus;

    async fn route_signal(
        &self,
        sender: &ClientId,
        request: SignalRequest,
    ) -> Result<RelayMessage, RelayError>;
}
