//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use walkie_server::infrastructure::dto::websocket::ServerEvent;
use walkie_shared::time::get_utc_timestamp;

use crate::{
    command::{HELP, InputCommand, parse_command},
    domain::ChannelView,
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket session.
///
/// Returns `Ok(())` when the user quits and an error when the connection
/// could not be made or was lost.
pub async fn run_client_session(
    url: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::from_connect(url, e))?;

    tracing::info!("Connected to {}", url);
    println!("\nConnected. Type 'help' for commands, 'quit' to exit.\n");

    let (mut write, mut read) = ws_stream.split();
    let mut view = ChannelView::default();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            view.apply(&event);
                            print!(
                                "{}",
                                MessageFormatter::format_event(&event, &view, get_utc_timestamp())
                            );
                        }
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
                    }
                    redisplay_prompt();
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost);
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => {
                // Ctrl+C / Ctrl+D on the prompt
                let Some(line) = line else {
                    let _ = write.close().await;
                    return Ok(());
                };

                match parse_command(&line) {
                    Ok(InputCommand::Send(event)) => match serde_json::to_string(&event) {
                        Ok(json) => {
                            if let Err(e) = write.send(Message::text(json)).await {
                                tracing::warn!("Failed to send event: {}", e);
                                return Err(ClientError::ConnectionLost);
                            }
                        }
                        Err(e) => tracing::error!("Failed to serialize event: {}", e),
                    },
                    Ok(InputCommand::Help) => {
                        print!("{}", HELP);
                        redisplay_prompt();
                    }
                    Ok(InputCommand::Quit) => {
                        let _ = write.close().await;
                        return Ok(());
                    }
                    Err(e) => {
                        println!("{}", e);
                        redisplay_prompt();
                    }
                }
            }
        }
    }
}
