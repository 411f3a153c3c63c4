//! Read model of one registered connection.

use std::net::SocketAddr;

use super::{ConnectionId, DisplayName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub remote_addr: SocketAddr,
}
