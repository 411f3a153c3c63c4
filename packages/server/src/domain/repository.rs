//! Storage contracts for the shared, process-wide relay state.
//!
//! The use cases depend only on these traits; the infrastructure layer
//! provides the concrete implementations. Implementations synchronize
//! internally, so callers never wrap them in a lock.

use async_trait::async_trait;

use super::{ConnectionHandle, ConnectionId, DeliveryError, DisplayName};

/// Outcome of fanning one frame out to a set of recipients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn record(&mut self, result: &Result<(), DeliveryError>) {
        match result {
            Ok(()) => self.delivered += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Set of live connections eligible for broadcast.
///
/// A handle is present iff the lifecycle coordinator considers its
/// connection live.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a live connection. Visible to every snapshot taken after
    /// this call returns.
    async fn add(&self, handle: ConnectionHandle);

    /// Deregister a connection, returning the handle if it was present.
    ///
    /// Only the caller that receives `Some` performed the removal.
    async fn remove(&self, id: &ConnectionId) -> Option<ConnectionHandle>;

    /// Point-in-time enumeration of the registered connections, each at most once
    async fn snapshot(&self) -> Vec<ConnectionHandle>;

    /// Handle registered under `id`, if it is still live
    async fn get(&self, id: &ConnectionId) -> Option<ConnectionHandle>;

    async fn contains(&self, id: &ConnectionId) -> bool;

    async fn count(&self) -> usize;

    /// Queue a frame for one registered connection.
    ///
    /// The handle is resolved at send time, so a connection removed before
    /// the push started is never targeted.
    ///
    /// # Errors
    ///
    /// * [`DeliveryError::ConnectionNotFound`] - not (or no longer) registered
    /// * [`DeliveryError::ChannelClosed`] - the writer task is gone
    async fn push_to(&self, id: &ConnectionId, content: &str) -> Result<(), DeliveryError>;

    /// Queue the same frame for every target, tolerating partial failure.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for target in targets {
            let result = self.push_to(&target, content).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to push frame to connection '{}': {}", target, e);
            }
            report.record(&result);
        }
        report
    }
}

/// Mapping from connection to its mutable display name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Insert or overwrite the display name. Last writer wins.
    async fn set_name(&self, handle: &ConnectionHandle, name: DisplayName);

    /// Stored name, or the handle's default name when no entry exists
    async fn get_name(&self, handle: &ConnectionHandle) -> DisplayName;

    /// Delete the entry; no-op if absent
    async fn remove(&self, handle: &ConnectionHandle);

    async fn count(&self) -> usize;
}
