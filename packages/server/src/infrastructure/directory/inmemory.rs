//! In-memory session directory backed by a sharded concurrent map.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{ConnectionHandle, ConnectionId, DisplayName, SessionDirectory};

/// Display names of the connections that announced one
#[derive(Debug, Default)]
pub struct InMemorySessionDirectory {
    names: DashMap<ConnectionId, DisplayName>,
}

impl InMemorySessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionDirectory for InMemorySessionDirectory {
    async fn set_name(&self, handle: &ConnectionHandle, name: DisplayName) {
        tracing::debug!("Connection '{}' is now known as '{}'", handle.id(), name);
        self.names.insert(handle.id(), name);
    }

    async fn get_name(&self, handle: &ConnectionHandle) -> DisplayName {
        self.names
            .get(&handle.id())
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| handle.default_name())
    }

    async fn remove(&self, handle: &ConnectionHandle) {
        self.names.remove(&handle.id());
    }

    async fn count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutboundFrame;
    use std::{net::SocketAddr, sync::Arc};
    use tokio::sync::mpsc;

    fn create_test_handle() -> (ConnectionHandle, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let addr: SocketAddr = "192.168.1.20:40123".parse().unwrap();
        (ConnectionHandle::new(ConnectionId::generate(), addr, tx), rx)
    }

    #[tokio::test]
    async fn test_get_name_falls_back_to_remote_address() {
        // テスト項目: エントリがない場合はリモートアドレスが名前として返される
        // given (前提条件):
        let directory = InMemorySessionDirectory::new();
        let (handle, _rx) = create_test_handle();

        // when (操作):
        let name = directory.get_name(&handle).await;

        // then (期待する結果):
        assert_eq!(name.as_str(), "192.168.1.20:40123");
        assert_eq!(directory.count().await, 0);
    }

    #[tokio::test]
    async fn test_set_name_last_writer_wins() {
        // テスト項目: 名前は上書きでき、最後に設定した名前が返される
        // given (前提条件):
        let directory = InMemorySessionDirectory::new();
        let (handle, _rx) = create_test_handle();

        // when (操作):
        directory.set_name(&handle, DisplayName::new("Alice")).await;
        directory.set_name(&handle, DisplayName::new("Bob")).await;

        // then (期待する結果):
        assert_eq!(directory.get_name(&handle).await.as_str(), "Bob");
        assert_eq!(directory.count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_and_empty_names_are_accepted() {
        // テスト項目: 重複した名前や空の名前もそのまま受け入れられる
        // given (前提条件):
        let directory = InMemorySessionDirectory::new();
        let (a, _rx_a) = create_test_handle();
        let (b, _rx_b) = create_test_handle();

        // when (操作):
        directory.set_name(&a, DisplayName::new("Alice")).await;
        directory.set_name(&b, DisplayName::new("Alice")).await;
        let (c, _rx_c) = create_test_handle();
        directory.set_name(&c, DisplayName::new("")).await;

        // then (期待する結果):
        assert_eq!(directory.get_name(&a).await, directory.get_name(&b).await);
        assert_eq!(directory.get_name(&c).await.as_str(), "");
    }

    #[tokio::test]
    async fn test_remove_restores_fallback_and_is_idempotent() {
        // テスト項目: 削除後はデフォルト名に戻り、二度目の削除も問題なく処理される
        // given (前提条件):
        let directory = InMemorySessionDirectory::new();
        let (handle, _rx) = create_test_handle();
        directory.set_name(&handle, DisplayName::new("Alice")).await;

        // when (操作):
        directory.remove(&handle).await;
        directory.remove(&handle).await;

        // then (期待する結果):
        assert_eq!(directory.count().await, 0);
        assert_eq!(directory.get_name(&handle).await, handle.default_name());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_on_distinct_keys() {
        // テスト項目: 複数タスクから並行に書き込んでも各エントリが失われない
        // given (前提条件):
        let directory = Arc::new(InMemorySessionDirectory::new());
        let mut tasks = Vec::new();

        // when (操作):
        for i in 0..32 {
            let directory = directory.clone();
            tasks.push(tokio::spawn(async move {
                let (handle, _rx) = create_test_handle();
                let name = DisplayName::new(format!("user-{}", i));
                directory.set_name(&handle, name.clone()).await;
                assert_eq!(directory.get_name(&handle).await, name);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(directory.count().await, 32);
    }
}
