//! Message formatting utilities for client display.

use walkie_server::infrastructure::dto::websocket::ServerEvent;
use walkie_shared::time::timestamp_to_clock_label;

use crate::domain::ChannelView;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one server event. `view` must already reflect the event.
    ///
    /// `received_at` is a Unix timestamp in milliseconds.
    pub fn format_event(event: &ServerEvent, view: &ChannelView, received_at: i64) -> String {
        let at = timestamp_to_clock_label(received_at);
        let name = |id: &str| {
            if view.is_me(id) {
                format!("{} (me)", id)
            } else {
                id.to_string()
            }
        };

        match event {
            ServerEvent::YourId(id) => format!("\n[{}] You are '{}'\n", at, id),
            ServerEvent::AllClients(ids) => Self::format_peers(ids),
            ServerEvent::NewClient(id) => format!("\n[{}] + {} joined\n", at, id),
            ServerEvent::ClientDisconnected(id) => format!("\n[{}] - {} left\n", at, id),
            ServerEvent::PttGranted => format!("\n[{}] >>> You have the floor. Talk now.\n", at),
            ServerEvent::PttDenied(reason) => {
                format!("\n[{}] Floor denied ({})\n", at, reason)
            }
            ServerEvent::PttReleased => format!("\n[{}] Floor is free\n", at),
            ServerEvent::PttExpired => format!("\n[{}] <<< Your floor hold expired\n", at),
            ServerEvent::SpeakerChanged(Some(id)) => {
                format!("\n[{}] {} is talking\n", at, name(id))
            }
            ServerEvent::SpeakerChanged(None) => format!("\n[{}] Nobody is talking\n", at),
            ServerEvent::Offer(relay) => {
                format!("\n[{}] offer from {}: {}\n", at, relay.from, relay.sdp)
            }
            ServerEvent::Answer(relay) => {
                format!("\n[{}] answer from {}: {}\n", at, relay.from, relay.sdp)
            }
            ServerEvent::IceCandidate(relay) => {
                format!(
                    "\n[{}] ice-candidate from {}: {}\n",
                    at, relay.from, relay.candidate
                )
            }
        }
    }

    /// Format the list of other participants
    pub fn format_peers(ids: &[String]) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str("Peers:\n");

        if ids.is_empty() {
            output.push_str("(No other participants)\n");
        } else {
            for id in ids {
                output.push_str(&format!("{}\n", id));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
