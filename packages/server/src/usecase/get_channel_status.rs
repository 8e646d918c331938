//! UseCase: チャンネル状態の取得（`/api/status`）

use std::sync::Arc;

use crate::domain::{ChannelRepository, FloorStatus, Participant};

pub struct GetChannelStatusUseCase {
    repository: Arc<dyn ChannelRepository>,
}

impl GetChannelStatusUseCase {
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// 現在の floor の状態と参加者一覧（接続時刻順）
    pub async fn execute(&self) -> (FloorStatus, Vec<Participant>) {
        let floor = self.repository.floor_status().await;
        let participants = self.repository.get_participants().await;
        (floor, participants)
    }
}
