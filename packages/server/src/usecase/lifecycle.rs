//! Lifecycle coordinator: turns transport events into use case calls.
//!
//! Each connection worker owns one [`ConnectionLifecycle`] and reports its
//! connection's events through the shared [`LifecycleCoordinator`]:
//!
//! ```text
//! transport shim ──→ LifecycleCoordinator ──→ ConnectParticipantUseCase
//!                                        ├──→ SendMessageUseCase
//!                                        └──→ DisconnectParticipantUseCase
//! ```

use std::{fmt, sync::Arc};

use kaiwa_shared::time::Clock;

use crate::domain::{
    ConnectionHandle, ConnectionRegistry, ConnectionState, DeliveryReport, SessionDirectory,
};

use super::{ConnectParticipantUseCase, DisconnectParticipantUseCase, SendMessageUseCase};

/// One connection's handle together with its lifecycle state
#[derive(Debug)]
pub struct ConnectionLifecycle {
    handle: ConnectionHandle,
    state: ConnectionState,
}

impl ConnectionLifecycle {
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            state: ConnectionState::Connecting,
        }
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }
}

/// Reacts to connect, message and disconnect events of every connection
pub struct LifecycleCoordinator {
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
}

impl LifecycleCoordinator {
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    ) -> Self {
        Self {
            connect_participant_usecase,
            send_message_usecase,
            disconnect_participant_usecase,
        }
    }

    /// Wire the coordinator and its use cases around shared stores
    pub fn with_stores(
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn SessionDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::new(
            Arc::new(ConnectParticipantUseCase::new(registry.clone(), clock)),
            Arc::new(SendMessageUseCase::new(registry.clone(), directory.clone())),
            Arc::new(DisconnectParticipantUseCase::new(registry, directory)),
        )
    }

    /// Connection established: register it and announce the join.
    ///
    /// Only a `Connecting` lifecycle is processed; the state becomes `Active`.
    pub async fn on_connect(&self, lifecycle: &mut ConnectionLifecycle) {
        if lifecycle.state != ConnectionState::Connecting {
            tracing::warn!(
                "Ignoring connect for '{}' in state {:?}",
                lifecycle.handle.id(),
                lifecycle.state
            );
            return;
        }

        self.connect_participant_usecase
            .execute(lifecycle.handle.clone())
            .await;
        lifecycle.state = ConnectionState::Active;
    }

    /// Line received: hand it to the broadcast engine while `Active`.
    ///
    /// Returns `None` when the event was ignored.
    pub async fn on_message(
        &self,
        lifecycle: &ConnectionLifecycle,
        body: &str,
    ) -> Option<DeliveryReport> {
        if lifecycle.state != ConnectionState::Active {
            tracing::debug!(
                "Dropping message from '{}' in state {:?}",
                lifecycle.handle.id(),
                lifecycle.state
            );
            return None;
        }

        Some(
            self.send_message_usecase
                .execute(&lifecycle.handle, body)
                .await,
        )
    }

    /// Unexpected transport error: close the connection and nothing else.
    ///
    /// The close surfaces later as a regular disconnect.
    pub fn on_transport_error(&self, lifecycle: &ConnectionLifecycle, error: &dyn fmt::Display) {
        tracing::warn!(
            "Transport error on connection '{}': {}",
            lifecycle.handle.id(),
            error
        );
        lifecycle.handle.close();
    }

    /// Connection closed: deregister it and announce the leave.
    ///
    /// The state becomes `Closed` and later events are ignored. Returns
    /// `true` only for the call that actually processed the disconnect.
    pub async fn on_disconnect(&self, lifecycle: &mut ConnectionLifecycle) -> bool {
        if lifecycle.state == ConnectionState::Closed {
            return false;
        }
        lifecycle.state = ConnectionState::Closed;

        self.disconnect_participant_usecase
            .execute(&lifecycle.handle)
            .await
            .is_some()
    }
}
