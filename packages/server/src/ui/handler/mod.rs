//! Transport shims and HTTP handlers.

pub mod http;
pub mod tcp;
pub mod websocket;
