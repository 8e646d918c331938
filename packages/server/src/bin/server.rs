//! Walkie signaling server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin walkie-server
//! cargo run --bin walkie-server -- --host 127.0.0.1 --port 3000 --floor-timeout-secs 10
//! PORT=3000 FLOOR_BROADCAST=everyone cargo run --bin walkie-server
//! ```

use clap::Parser;
use walkie_server::{
    config::{ServerArgs, ServerConfig},
    ui::Server,
};
use walkie_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = ServerArgs::parse();
    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Floor hold time {}s, floor broadcast {:?}",
        config.floor_timeout.as_secs(),
        config.floor_broadcast
    );

    let server = Server::new(&config);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
