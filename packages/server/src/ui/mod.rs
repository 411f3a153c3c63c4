//! UI layer: transports, HTTP API and server bootstrap.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::tcp::{MAX_LINE_LEN, serve_lines};
pub use server::{Server, ServerConfig};
