//! Walkie: push-to-talk floor control and WebRTC signaling relay.
//!
//! One process hosts a single talk channel. Participants connect over a
//! WebSocket, take turns holding the floor, and exchange SDP offers/answers
//! and ICE candidates through the relay. Media never passes through here.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
