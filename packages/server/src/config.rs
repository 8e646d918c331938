//! Server configuration.
//!
//! Every option can be given on the command line or through the environment
//! (`PORT=8080 walkie-server`).

use std::time::Duration;

use axum::http::HeaderValue;
use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::domain::BroadcastScope;

/// Upper bound for `--floor-timeout-secs`
pub const MAX_FLOOR_TIMEOUT_SECS: u64 = 3600;

#[derive(Parser, Debug, Clone)]
#[command(name = "walkie-server")]
#[command(about = "Push-to-talk floor control and WebRTC signaling relay", long_about = None)]
pub struct ServerArgs {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 10000)]
    pub port: u16,

    /// Seconds a granted floor is held before it is released automatically
    #[arg(long, env = "FLOOR_TIMEOUT_SECS", default_value_t = 30)]
    pub floor_timeout_secs: u64,

    /// Who is told about floor grants and releases
    #[arg(long, env = "FLOOR_BROADCAST", value_enum, default_value_t = FloorBroadcast::Others)]
    pub floor_broadcast: FloorBroadcast,

    /// Allowed CORS origin for the HTTP API (any origin when omitted)
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FloorBroadcast {
    /// Everyone except the participant who caused the change
    Others,
    /// Every participant, including the one who caused the change
    Everyone,
}

impl From<FloorBroadcast> for BroadcastScope {
    fn from(value: FloorBroadcast) -> Self {
        match value {
            FloorBroadcast::Others => BroadcastScope::Others,
            FloorBroadcast::Everyone => BroadcastScope::Everyone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("floor timeout must be between 1 and 3600 seconds, got {0}")]
    InvalidFloorTimeout(u64),
    #[error("invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub floor_timeout: Duration,
    pub floor_broadcast: BroadcastScope,
    pub cors_origin: Option<HeaderValue>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            floor_timeout: Duration::from_secs(30),
            floor_broadcast: BroadcastScope::default(),
            cors_origin: None,
        }
    }
}

impl TryFrom<ServerArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        if args.floor_timeout_secs == 0 || args.floor_timeout_secs > MAX_FLOOR_TIMEOUT_SECS {
            return Err(ConfigError::InvalidFloorTimeout(args.floor_timeout_secs));
        }

        let cors_origin = args
            .cors_origin
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidCorsOrigin(origin))
            })
            .transpose()?;

        Ok(Self {
            host: args.host,
            port: args.port,
            floor_timeout: Duration::from_secs(args.floor_timeout_secs),
            floor_broadcast: args.floor_broadcast.into(),
            cors_origin,
        })
    }
}
