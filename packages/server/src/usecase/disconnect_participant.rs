//! UseCase: a connection has closed
//!
//! Removal from the registry gates the whole operation: only the caller
//! that actually removed the handle forgets its name and announces the
//! leave, so a connection is never announced twice.

use std::sync::Arc;

use crate::domain::{ConnectionHandle, ConnectionId, ConnectionRegistry, SessionDirectory, frame};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    directory: Arc<dyn SessionDirectory>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn SessionDirectory>,
    ) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Deregister `handle`, drop its directory entry and announce the leave.
    ///
    /// # Returns
    ///
    /// * `Some(targets)` - the remaining connections the announcement went to
    /// * `None` - the handle was not registered (already processed)
    pub async fn execute(&self, handle: &ConnectionHandle) -> Option<Vec<ConnectionId>> {
        self.registry.remove(&handle.id()).await?;

        let name = self.directory.get_name(handle).await;
        self.directory.remove(handle).await;

        let targets: Vec<ConnectionId> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .map(|h| h.id())
            .collect();
        let report = self
            .registry
            .broadcast(targets.clone(), &frame::leave_announcement(&name))
            .await;

        tracing::info!(
            "Connection '{}' ({}) left, announced to {} of {} connections",
            handle.id(),
            name,
            report.delivered,
            report.attempted()
        );

        Some(targets)
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_participants(&self) -> usize {
        self.registry.count().await
    }
}
