//! Interactive push-to-talk client.
//!
//! Connects to a Walkie signaling server, sends commands typed at the prompt
//! and prints the events the server pushes. Reconnects on connection loss
//! (up to 5 times, 5 seconds apart).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin walkie-client
//! cargo run --bin walkie-client -- --url ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use walkie_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "walkie-client")]
#[command(about = "Interactive push-to-talk client for the Walkie signaling server", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, env = "WALKIE_URL", default_value = "ws://127.0.0.1:10000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = walkie_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
