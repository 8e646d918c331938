//! InMemory Channel Repository 実装
//!
//! ドメイン層が定義する ChannelRepository trait の具体的な実装。
//! `Channel`（Registry + FloorController）を一つの Mutex で保持し、
//! 各メソッドはロックを一度だけ取得して遷移を最後まで実行します。
//! ハンドラ同士が状態の変更で交錯しないのはこのためです。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::{sync::Mutex, time::Instant};

use crate::domain::{
    Channel, ChannelRepository, ClientId, FloorDecision, FloorStatus, HoldToken, Participant,
    RegistryError, RelayError, RelayMessage, SignalRequest,
};

/// インメモリ Channel Repository 実装
pub struct InMemoryChannelRepository {
    channel: Arc<Mutex<Channel>>,
}

impl InMemoryChannelRepository {
    /// 新しい InMemoryChannelRepository を作成
    pub fn new(channel: Arc<Mutex<Channel>>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn add_participant(&self, participant: Participant) -> Result<(), RegistryError> {
        let mut channel = self.channel.lock().await;
        channel.register(participant)
    }

    async fn remove_participant(&self, client_id: &ClientId) -> Option<Participant> {
        let mut channel = self.channel.lock().await;
        channel.unregister(client_id)
    }

    async fn contains(&self, client_id: &ClientId) -> bool {
        let channel = self.channel.lock().await;
        channel.registry().contains(client_id)
    }

    async fn list_others(&self, client_id: &ClientId) -> Vec<ClientId> {
        let channel = self.channel.lock().await;
        channel.registry().list_others(client_id)
    }

    async fn get_all_connected_client_ids(&self) -> Vec<ClientId> {
        let channel = self.channel.lock().await;
        channel.registry().ids()
    }

    async fn count_connected_clients(&self) -> usize {
        let channel = self.channel.lock().await;
        channel.registry().len()
    }

    async fn get_participants(&self) -> Vec<Participant> {
        let channel = self.channel.lock().await;
        channel.registry().participants()
    }

    async fn attach_metadata(
        &self,
        client_id: &ClientId,
        metadata: Value,
    ) -> Result<(), RegistryError> {
        let mut channel = self.channel.lock().await;
        channel.attach_metadata(client_id, metadata)
    }

    async fn request_floor(&self, client_id: &ClientId) -> Result<FloorDecision, RegistryError> {
        let mut channel = self.channel.lock().await;
        channel.request_floor(client_id, Instant::now())
    }

    async fn release_floor(&self, client_id: &ClientId) -> bool {
        let mut channel = self.channel.lock().await;
        channel.release_floor(client_id)
    }

    async fn expire_floor(&self, hold: &HoldToken) -> Option<ClientId> {
        let mut channel = self.channel.lock().await;
        channel.expire_floor(hold)
    }

    async fn release_floor_on_disconnect(&self, client_id: &ClientId) -> bool {
        let mut channel = self.channel.lock().await;
        channel.release_floor_on_disconnect(client_id)
    }

    async fn floor_status(&self) -> FloorStatus {
        let channel = self.channel.lock().await;
        channel.floor_status(Instant::now())
    }

    async fn route_signal(
        &self,
        sender: &ClientId,
        request: SignalRequest,
    ) -> Result<RelayMessage, RelayError> {
        let channel = self.channel.lock().await;
        channel.route_signal(sender, request)
    }
}
