//! tokio による FloorTimer 実装
//!
//! 期限が来たら `HoldToken` を mpsc チャネルに送るだけで、状態には触れない。
//! 受信側（`ui::server` の expiry loop）が `FloorControlUseCase::expire` を呼ぶ。

use std::time::Duration;

use tokio::{sync::mpsc, task::AbortHandle};

use crate::domain::{ArmedTimer, FloorTimer, HoldToken};

pub type ExpiryReceiver = mpsc::UnboundedReceiver<HoldToken>;

#[derive(Debug, Clone)]
pub struct TokioFloorTimer {
    expiry_tx: mpsc::UnboundedSender<HoldToken>,
}

impl TokioFloorTimer {
    /// タイマーと、期限切れの hold を受け取る receiver を作成
    pub fn new() -> (Self, ExpiryReceiver) {
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        (Self { expiry_tx }, expiry_rx)
    }
}

impl FloorTimer for TokioFloorTimer {
    fn arm(&self, hold: HoldToken, after: Duration) -> Box<dyn ArmedTimer> {
        let expiry_tx = self.expiry_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::debug!(
                "Floor timer fired for '{}' (generation {})",
                hold.holder,
                hold.generation
            );
            // receiver が閉じている = サーバー停止中
            let _ = expiry_tx.send(hold);
        });
        Box::new(TokioArmedTimer {
            handle: task.abort_handle(),
        })
    }
}

struct TokioArmedTimer {
    handle: AbortHandle,
}

impl ArmedTimer for TokioArmedTimer {
    fn cancel(self: Box<Self>) {
        self.handle.abort();
    }
}
