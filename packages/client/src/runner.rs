//! Client execution logic with reconnection support.

use crate::{
    domain::{ReconnectPolicy, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
    ui::spawn_readline,
};

/// Run the client until the user quits or reconnection gives up
pub async fn run_client(url: String) -> Result<(), ClientError> {
    let policy = ReconnectPolicy::default();
    let mut input_rx = spawn_readline();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Connecting to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            policy.max_attempts + 1
        );

        match run_client_session(&url, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) if should_exit_immediately(&e) => return Err(e),
            Err(e) => {
                tracing::warn!("{}", e);
                if !policy.should_attempt_reconnect(&e, reconnect_count) {
                    return Err(ClientError::ReconnectExhausted(reconnect_count));
                }
                reconnect_count += 1;

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    policy.interval.as_secs(),
                    reconnect_count + 1,
                    policy.max_attempts + 1
                );
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}
