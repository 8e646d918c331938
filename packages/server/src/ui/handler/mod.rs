mod http;
mod websocket;

pub use http::{health_check, index, status};
pub use websocket::websocket_handler;
