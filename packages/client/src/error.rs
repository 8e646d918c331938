//! Error types for the client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL can never work (bad scheme, unparsable)
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection went away
    #[error("Connection lost")]
    ConnectionLost,

    /// Reconnection attempts exhausted
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}

impl ClientError {
    pub(crate) fn from_connect(url: &str, error: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error;

        match error {
            Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
            other => ClientError::ConnectionError(other.to_string()),
        }
    }
}
