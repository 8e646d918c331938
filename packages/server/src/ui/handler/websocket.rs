//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ClientId, Command},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::EventDispatcher,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Read frames from the client and hand each command to the dispatcher.
///
/// `stop` is only checked between frames, so a command that is being
/// dispatched always runs to completion.
async fn receive_loop<S>(
    mut receiver: S,
    mut stop: oneshot::Receiver<()>,
    dispatcher: Arc<EventDispatcher>,
    client_id: ClientId,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut stop => break,
        };
        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error from '{}': {}", client_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => {
                    dispatcher.dispatch(&client_id, Command::from(event)).await;
                }
                Err(e) => {
                    tracing::warn!("Ignored unparsable message from '{}': {}", client_id, e);
                }
            },
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", client_id);
                break;
            }
            // Ping/pong is answered by axum
            _ => {}
        }
    }
}

/// Forward frames queued by the MessagePusher to this client's socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // ID はサーバーが接続ごとに払い出す
    let client_id = ClientId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    let (sender, receiver) = socket.split();

    if let Err(e) = state
        .connect_participant_usecase
        .execute(client_id.clone(), tx)
        .await
    {
        tracing::warn!("Rejected connection '{}': {}", client_id, e);
        return;
    }
    tracing::info!("Client '{}' connected", client_id);

    let mut send_task = pusher_loop(rx, sender);
    let (stop_tx, stop_rx) = oneshot::channel();
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        stop_rx,
        state.dispatcher.clone(),
        client_id.clone(),
    ));

    let send_finished_first = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
    };
    if send_finished_first {
        // 受信を止めるだけで、処理中のコマンドは最後まで実行させる
        let _ = stop_tx.send(());
        if let Err(e) = recv_task.await {
            tracing::warn!("Receive loop of '{}' failed: {}", client_id, e);
        }
    } else {
        send_task.abort();
    }

    if state
        .disconnect_participant_usecase
        .execute(&client_id)
        .await
    {
        tracing::info!(
            "Client '{}' disconnected ({} remaining)",
            client_id,
            state
                .disconnect_participant_usecase
                .count_remaining_participants()
                .await
        );
    }
}
