//! Domain error types.

use thiserror::Error;

use super::ConnectionId;

/// Failure to deliver one frame to one recipient.
///
/// Always recoverable: callers log it and move on to the next recipient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The connection is no longer registered
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    /// The connection's writer has shut down
    #[error("outbound channel for connection '{0}' is closed")]
    ChannelClosed(ConnectionId),
}
