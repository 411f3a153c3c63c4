//! Connection handles and the per-connection lifecycle state.

use std::{
    hash::{Hash, Hasher},
    net::SocketAddr,
};

use tokio::sync::mpsc;

use super::{ConnectionId, DeliveryError, DisplayName};

/// Frames queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Text written to the peer verbatim
    Text(String),
    /// Ask the writer to close the connection
    Close,
}

/// Outbound queue feeding one connection's writer task.
///
/// Unbounded so a slow peer only grows its own queue and never stalls
/// delivery to the others.
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

/// Opaque reference to one live client connection.
///
/// Carries the connection's identity, its transport address and the
/// capability to queue frames for it or close it. Equality and hashing
/// only look at the id.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    remote_addr: SocketAddr,
    outbound: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, remote_addr: SocketAddr, outbound: PusherChannel) -> Self {
        Self {
            id,
            remote_addr,
            outbound,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Name used when the session directory has no entry for this connection
    pub fn default_name(&self) -> DisplayName {
        DisplayName::new(self.remote_addr.to_string())
    }

    /// Queue a text frame for this connection.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::ChannelClosed`] once the writer task is gone.
    pub fn send(&self, text: impl Into<String>) -> Result<(), DeliveryError> {
        self.outbound
            .send(OutboundFrame::Text(text.into()))
            .map_err(|_| DeliveryError::ChannelClosed(self.id))
    }

    /// Ask the transport to close this connection.
    ///
    /// The shim observes the close and reports it as a normal disconnect.
    /// Closing an already closed connection is a no-op.
    pub fn close(&self) {
        if self.outbound.send(OutboundFrame::Close).is_err() {
            tracing::debug!("Connection '{}' already closed", self.id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

impl Hash for ConnectionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Lifecycle of one connection as seen by the coordinator.
///
/// ```text
/// CONNECTING ──on_connect──→ ACTIVE ──on_disconnect──→ CLOSED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_handle() -> (ConnectionHandle, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let addr: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        (ConnectionHandle::new(ConnectionId::generate(), addr, tx), rx)
    }

    #[test]
    fn test_handle_equality_is_identity_based() {
        // テスト項目: 同じ id のハンドルは等しく、異なる id のハンドルは等しくない
        // given (前提条件):
        let (a, _rx_a) = create_test_handle();
        let (b, _rx_b) = create_test_handle();

        // when (操作):
        let a_clone = a.clone();

        // then (期待する結果):
        assert_eq!(a, a_clone);
        assert_ne!(a, b);
        assert_eq!(a.remote_addr(), b.remote_addr());
    }

    #[test]
    fn test_default_name_is_remote_address() {
        // テスト項目: デフォルト名はリモートアドレスの文字列表現になる
        // given (前提条件):
        let (handle, _rx) = create_test_handle();

        // when (操作):
        let name = handle.default_name();

        // then (期待する結果):
        assert_eq!(name.as_str(), "127.0.0.1:50000");
    }

    #[tokio::test]
    async fn test_send_and_close_enqueue_frames_in_order() {
        // テスト項目: send と close がキューに順番通り積まれる
        // given (前提条件):
        let (handle, mut rx) = create_test_handle();

        // when (操作):
        handle.send("hello").unwrap();
        handle.close();

        // then (期待する結果):
        assert_eq!(rx.recv().await, Some(OutboundFrame::Text("hello".to_string())));
        assert_eq!(rx.recv().await, Some(OutboundFrame::Close));
    }

    #[test]
    fn test_send_after_writer_dropped_fails() {
        // テスト項目: writer 側が破棄された後の send は ChannelClosed になる
        // given (前提条件):
        let (handle, rx) = create_test_handle();
        drop(rx);

        // when (操作):
        let result = handle.send("late");

        // then (期待する結果):
        assert_eq!(result, Err(DeliveryError::ChannelClosed(handle.id())));
        assert!(handle.is_closed());
        // close on a dead connection must not panic
        handle.close();
    }
}
