//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, EventDispatcher,
    FloorControlUseCase, GetChannelStatusUseCase,
};

/// Use cases reachable from the handlers
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// 受信コマンドの振り分け
    pub dispatcher: Arc<EventDispatcher>,
    /// タイマー満了の適用（expiry loop から使う）
    pub floor_control_usecase: Arc<FloorControlUseCase>,
    pub get_channel_status_usecase: Arc<GetChannelStatusUseCase>,
}
