//! Domain layer: connection identity, display names, frames and the
//! storage contracts the core depends on.

pub mod connection;
pub mod error;
pub mod frame;
pub mod participant;
pub mod repository;
pub mod value_object;

pub use connection::{ConnectionHandle, ConnectionState, OutboundFrame, PusherChannel};
pub use error::DeliveryError;
pub use participant::Participant;
pub use repository::{ConnectionRegistry, DeliveryReport, SessionDirectory};
pub use value_object::{ConnectionId, DisplayName, Timestamp};

#[cfg(test)]
pub use repository::MockSessionDirectory;
