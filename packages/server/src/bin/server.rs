//! Multi-client chat relay server.
//!
//! Every line a client sends is relayed to all other connected clients,
//! labeled with the sender's display name; the sender gets an echo.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaiwa-server
//! cargo run --bin kaiwa-server -- --host 0.0.0.0 --port 3000 --tcp-port 3001
//! ```

use std::sync::Arc;

use clap::Parser;
use kaiwa_server::{
    infrastructure::{directory::InMemorySessionDirectory, registry::InMemoryConnectionRegistry},
    ui::{Server, ServerConfig},
    usecase::{GetParticipantsUseCase, LifecycleCoordinator},
};
use kaiwa_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kaiwa-server")]
#[command(about = "Chat relay server with TCP line and WebSocket transports", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP API and the WebSocket endpoint
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Port for the raw TCP line protocol
    #[arg(short = 't', long, default_value = "9000")]
    tcp_port: u16,

    /// Disable the raw TCP line protocol listener
    #[arg(long)]
    no_tcp: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            tcp_port: (!args.no_tcp).then_some(args.tcp_port),
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Shared stores
    // 2. Lifecycle coordinator (wires the connect / send / disconnect UseCases)
    // 3. Query UseCases
    // 4. Server

    // 1. Create the connection registry and session directory (in-memory)
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let directory = Arc::new(InMemorySessionDirectory::new());
    let clock = Arc::new(SystemClock);

    // 2. Create the coordinator shared by every connection worker
    let coordinator = Arc::new(LifecycleCoordinator::with_stores(
        registry.clone(),
        directory.clone(),
        clock,
    ));

    // 3. Create UseCases for the HTTP API
    let get_participants_usecase = Arc::new(GetParticipantsUseCase::new(registry, directory));

    // 4. Create and run the server
    let server = Server::new(coordinator, get_participants_usecase);
    if let Err(e) = server.run(args.into()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
