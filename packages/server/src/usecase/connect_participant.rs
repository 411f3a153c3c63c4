//! UseCase: a connection has been established
//!
//! Registers the connection and announces it to the whole registry,
//! the newcomer included: the handle is added before the announcement's
//! recipients are enumerated.

use std::sync::Arc;

use kaiwa_shared::time::{Clock, format_local_timestamp};

use crate::domain::{ConnectionHandle, ConnectionRegistry, Timestamp, frame};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Register `handle` and broadcast the join announcement.
    ///
    /// # Returns
    ///
    /// The time the connection was registered
    pub async fn execute(&self, handle: ConnectionHandle) -> Timestamp {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let remote_addr = handle.remote_addr();
        let id = handle.id();

        self.registry.add(handle).await;

        let announcement =
            frame::join_announcement(remote_addr, &format_local_timestamp(connected_at.value()));
        let targets = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .map(|h| h.id())
            .collect();
        let report = self.registry.broadcast(targets, &announcement).await;

        tracing::info!(
            "Connection '{}' from {} joined, announced to {} of {} connections",
            id,
            remote_addr,
            report.delivered,
            report.attempted()
        );

        connected_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{create_test_handle, create_test_stores, drain_texts};
    use kaiwa_shared::time::FixedClock;

    const NOW: i64 = 1_700_000_000_000;

    fn create_usecase(registry: Arc<dyn ConnectionRegistry>) -> ConnectParticipantUseCase {
        ConnectParticipantUseCase::new(registry, Arc::new(FixedClock::new(NOW)))
    }

    #[tokio::test]
    async fn test_connect_registers_and_announces_to_newcomer() {
        // テスト項目: 接続した本人も自分の入室アナウンスを受け取る
        // given (前提条件):
        let (registry, _directory) = create_test_stores();
        let usecase = create_usecase(registry.clone());
        let (alice, mut rx_alice) = create_test_handle(5001);

        // when (操作):
        let connected_at = usecase.execute(alice.clone()).await;

        // then (期待する結果):
        assert_eq!(connected_at.value(), NOW);
        assert!(registry.contains(&alice.id()).await);
        let expected = format!(
            "[system] new user 127.0.0.1:5001 joined at {}\r\n",
            format_local_timestamp(NOW)
        );
        assert_eq!(drain_texts(&mut rx_alice), vec![expected]);
    }

    #[tokio::test]
    async fn test_connect_announces_to_existing_participants() {
        // テスト項目: 既存の参加者全員に入室アナウンスが届く
        // given (前提条件):
        let (registry, _directory) = create_test_stores();
        let usecase = create_usecase(registry.clone());
        let (alice, mut rx_alice) = create_test_handle(5001);
        let (bob, mut rx_bob) = create_test_handle(5002);
        usecase.execute(alice).await;
        drain_texts(&mut rx_alice);

        // when (操作):
        usecase.execute(bob).await;

        // then (期待する結果):
        let alice_frames = drain_texts(&mut rx_alice);
        let bob_frames = drain_texts(&mut rx_bob);
        assert_eq!(alice_frames.len(), 1);
        assert!(alice_frames[0].starts_with("[system] new user 127.0.0.1:5002 joined at "));
        assert_eq!(alice_frames, bob_frames);
        assert_eq!(registry.count().await, 2);
    }
}
