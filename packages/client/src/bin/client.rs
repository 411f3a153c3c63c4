//! Interactive chat client for the kaiwa relay.
//!
//! Sends every line typed on stdin to the relay and prints every frame it
//! receives. Reconnects on connection loss (max 5 attempts, 5 seconds apart).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaiwa-client -- --name Alice
//! cargo run --bin kaiwa-client -- -u ws://127.0.0.1:3000/ws -n Bob
//! ```

use clap::Parser;

use kaiwa_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kaiwa-client")]
#[command(about = "Interactive chat client for the kaiwa relay", long_about = None)]
struct Args {
    /// Display name announced to the relay on connect
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// WebSocket endpoint of the relay
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = kaiwa_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
