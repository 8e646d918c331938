//! Server assembly and execution.

use std::{future::Future, sync::Arc};

use axum::{Router, http::Method, routing::get};
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use walkie_shared::time::SystemClock;

use crate::{
    config::ServerConfig,
    domain::{Channel, FloorController},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryChannelRepository,
        timer::{ExpiryReceiver, TokioFloorTimer},
    },
    usecase::{
        ChannelGate, ConnectParticipantUseCase, DisconnectParticipantUseCase, EventDispatcher,
        FloorControlUseCase, GetChannelStatusUseCase, RegisterMetadataUseCase,
        RelaySignalUseCase,
    },
};

use super::{
    handler::{health_check, index, status, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Walkie signaling server
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::try_from(ServerArgs::parse())?;
/// Server::new(&config).run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    expiry_rx: ExpiryReceiver,
    cors: CorsLayer,
}

impl Server {
    /// Wire up the channel, the message pusher and the use cases.
    pub fn new(config: &ServerConfig) -> Self {
        // 1. Repository (one process-wide channel)
        let (timer, expiry_rx) = TokioFloorTimer::new();
        let channel = Channel::new(FloorController::new(config.floor_timeout, Box::new(timer)));
        let repository = Arc::new(InMemoryChannelRepository::new(Arc::new(Mutex::new(channel))));

        // 2. MessagePusher
        let message_pusher = Arc::new(WebSocketMessagePusher::new());

        // 3. UseCases (all channel work goes through one gate)
        let gate = ChannelGate::new();
        let floor_control_usecase = Arc::new(FloorControlUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            gate.clone(),
            config.floor_broadcast,
        ));
        let dispatcher = Arc::new(EventDispatcher::new(
            floor_control_usecase.clone(),
            Arc::new(RelaySignalUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                gate.clone(),
            )),
            Arc::new(RegisterMetadataUseCase::new(repository.clone())),
            repository.clone(),
            message_pusher.clone(),
            gate.clone(),
        ));
        let state = Arc::new(AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                gate.clone(),
                Arc::new(SystemClock),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher,
                gate,
            )),
            dispatcher,
            floor_control_usecase,
            get_channel_status_usecase: Arc::new(GetChannelStatusUseCase::new(repository)),
        });

        let allow_origin = match &config.cors_origin {
            Some(origin) => AllowOrigin::exact(origin.clone()),
            None => AllowOrigin::any(),
        };
        let cors = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET]);

        Self {
            state,
            expiry_rx,
            cors,
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/status", get(status))
            .layer(self.cors.clone())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to `bind_addr` and serve until Ctrl+C or SIGTERM.
    pub async fn run(self, bind_addr: &str) -> std::io::Result<()> {
        let listener = TcpListener::bind(bind_addr).await?;
        tracing::info!(
            "Walkie signaling server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let expiry_task = spawn_expiry_loop(self.state.clone(), self.expiry_rx);

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        expiry_task.abort();
        tracing::info!("Server shutdown complete");
        result
    }
}

/// Apply fired floor timers one at a time, in firing order.
fn spawn_expiry_loop(state: Arc<AppState>, mut expiry_rx: ExpiryReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(hold) = expiry_rx.recv().await {
            state.floor_control_usecase.expire(hold).await;
        }
    })
}
