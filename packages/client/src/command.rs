//! Parsing of prompt input into outbound events.

use serde_json::{Value, json};
use thiserror::Error;
use walkie_server::infrastructure::dto::websocket::{
    ClientEvent, IceCandidateRequest, SessionDescriptionRequest,
};

pub const HELP: &str = "\
Commands:
  talk                    request the floor (again to renew)
  release                 release the floor
  peers                   list the other participants
  name <text>             register a display name (once)
  offer <id> <sdp>        send an SDP offer to a peer
  answer <id> <sdp>       send an SDP answer to a peer
  ice <id> <candidate>    send an ICE candidate to a peer
  help                    show this help
  quit                    disconnect and exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    Send(ClientEvent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse one prompt line. Payload arguments are sent as JSON when they parse
/// as JSON and as a plain string otherwise.
pub fn parse_command(line: &str) -> Result<InputCommand, CommandError> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let event = match verb {
        "talk" => ClientEvent::RequestPtt,
        "release" => ClientEvent::ReleasePtt,
        "peers" => ClientEvent::RequestAllClients,
        "help" => return Ok(InputCommand::Help),
        "quit" | "exit" => return Ok(InputCommand::Quit),
        "name" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("name <text>"));
            }
            ClientEvent::RegisterUser(json!({"name": rest}))
        }
        "offer" | "answer" => {
            let (to, sdp) = addressed(rest).ok_or(CommandError::Usage(if verb == "offer" {
                "offer <id> <sdp>"
            } else {
                "answer <id> <sdp>"
            }))?;
            let body = SessionDescriptionRequest {
                to: Some(to),
                sdp: Some(sdp),
            };
            if verb == "offer" {
                ClientEvent::Offer(body)
            } else {
                ClientEvent::Answer(body)
            }
        }
        "ice" => {
            let (to, candidate) = addressed(rest).ok_or(CommandError::Usage("ice <id> <candidate>"))?;
            ClientEvent::IceCandidate(IceCandidateRequest {
                to: Some(to),
                candidate: Some(candidate),
            })
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(InputCommand::Send(event))
}

fn addressed(rest: &str) -> Option<(String, Value)> {
    let (to, payload) = rest.split_once(char::is_whitespace)?;
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    let payload =
        serde_json::from_str(payload).unwrap_or_else(|_| Value::String(payload.to_string()));
    Some((to.to_string(), payload))
}
