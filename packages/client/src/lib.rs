//! Interactive client for the kaiwa chat relay.

mod domain;
mod error;
mod input;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
