//! Interactive push-to-talk client for the Walkie signaling server.
//!
//! Reads commands from a readline prompt, sends them as WebSocket events and
//! prints what the server pushes back. Reconnects on connection loss.

mod command;
mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
