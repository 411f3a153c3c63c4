//! kaiwa chat relay server.
//!
//! Clients connect over TCP (one message per line) or WebSocket, announce
//! a display name with `my name:<name>`, and every line they send is
//! relayed to all other connected clients, labeled with the sender's name.
//! The sender gets an echo of its own message.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
