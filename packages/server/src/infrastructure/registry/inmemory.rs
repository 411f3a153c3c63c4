//! In-memory connection registry
//!
//! ## Responsibilities
//!
//! - Hold the handle (and therefore the outbound queue) of every live connection
//! - Queue frames for registered connections (`push_to`, `broadcast`)
//!
//! ## Concurrency
//!
//! Backed by a `DashMap`. `push_to` queues the frame while holding the
//! entry's shard read guard, and `remove` needs the shard write guard, so
//! once `remove` has returned no push can reach the removed connection.
//! Snapshots are weakly consistent: each live connection appears at most
//! once and a connection registered for the whole call always appears.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ConnectionHandle, ConnectionId, ConnectionRegistry, DeliveryError};

/// Registry of live connections kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: connection id, Value: the connection's handle
    connections: DashMap<ConnectionId, ConnectionHandle>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, handle: ConnectionHandle) {
        let id = handle.id();
        self.connections.insert(id, handle);
        tracing::debug!("Connection '{}' added to registry", id);
    }

    async fn remove(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        let removed = self.connections.remove(id).map(|(_, handle)| handle);
        if removed.is_some() {
            tracing::debug!("Connection '{}' removed from registry", id);
        }
        removed
    }

    async fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn get(&self, id: &ConnectionId) -> Option<ConnectionHandle> {
        self.connections.get(id).map(|entry| entry.value().clone())
    }

    async fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    async fn count(&self) -> usize {
        self.connections.len()
    }

    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), DeliveryError> {
        let entry = self
            .connections
            .get(id)
            .ok_or(DeliveryError::ConnectionNotFound(*id))?;
        entry.value().send(content)?;
        tracing::debug!("Pushed frame to connection '{}'", id);
        Ok(())
    }
}
