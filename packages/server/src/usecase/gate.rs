//! チャンネル単位の直列化
//!
//! 状態遷移・通知先の決定・送信キューへの投入を一つのまとまりとして実行するため、
//! チャンネルを操作するユースケースは全て同じ `ChannelGate` を通る。
//! 送信はキューへの投入だけなので、ゲートを保持したまま行ってよい。
//!
//! ゲートは再入できない。ゲートを保持したまま別のユースケースを呼ばないこと。

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
pub struct ChannelGate(Arc<Mutex<()>>);

impl ChannelGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// ハンドラ一つ分の区間に入る。戻り値を drop すると抜ける。
    pub async fn enter(&self) -> OwnedMutexGuard<()> {
        self.0.clone().lock_owned().await
    }
}
