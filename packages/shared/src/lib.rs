//! Utilities shared by the kaiwa server and client.

pub mod logger;
pub mod time;
