//! UseCase layer: the operations the transport shims drive.
//!
//! - `connect_participant`: register a connection, announce the join
//! - `send_message`: the broadcast engine (name changes, relay/echo fan-out)
//! - `disconnect_participant`: deregister, forget the name, announce the leave
//! - `get_participants`: read model for the diagnostics API
//! - `lifecycle`: per-connection state machine tying the above together

pub mod connect_participant;
pub mod disconnect_participant;
pub mod get_participants;
pub mod lifecycle;
pub mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use get_participants::GetParticipantsUseCase;
pub use lifecycle::{ConnectionLifecycle, LifecycleCoordinator};
pub use send_message::SendMessageUseCase;

#[cfg(test)]
pub(crate) mod test_support {
    use std::{net::SocketAddr, sync::Arc};

    use tokio::sync::mpsc;

    use crate::{
        domain::{ConnectionHandle, ConnectionId, OutboundFrame},
        infrastructure::{
            directory::InMemorySessionDirectory, registry::InMemoryConnectionRegistry,
        },
    };

    pub fn create_test_handle(
        port: u16,
    ) -> (ConnectionHandle, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let addr: SocketAddr = format!("127.0.0.1:{}", port).parse().unwrap();
        (ConnectionHandle::new(ConnectionId::generate(), addr, tx), rx)
    }

    pub fn create_test_stores() -> (
        Arc<InMemoryConnectionRegistry>,
        Arc<InMemorySessionDirectory>,
    ) {
        (
            Arc::new(InMemoryConnectionRegistry::new()),
            Arc::new(InMemorySessionDirectory::new()),
        )
    }

    /// Drain every text frame currently queued for a connection
    pub fn drain_texts(rx: &mut mpsc::UnboundedReceiver<OutboundFrame>) -> Vec<String> {
        let mut texts = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            if let OutboundFrame::Text(text) = frame {
                texts.push(text);
            }
        }
        texts
    }
}
