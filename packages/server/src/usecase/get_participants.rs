//! UseCase: list the registered connections with their display names

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Participant, SessionDirectory};

pub struct GetParticipantsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    directory: Arc<dyn SessionDirectory>,
}

impl GetParticipantsUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn SessionDirectory>,
    ) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Registered connections sorted by name, then by id
    pub async fn execute(&self) -> Vec<Participant> {
        let mut participants = Vec::new();
        for handle in self.registry.snapshot().await {
            participants.push(Participant {
                id: handle.id(),
                name: self.directory.get_name(&handle).await,
                remote_addr: handle.remote_addr(),
            });
        }

        participants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::DisplayName,
        usecase::test_support::{create_test_handle, create_test_stores},
    };

    #[tokio::test]
    async fn test_participants_sorted_by_name() {
        // テスト項目: 参加者リストが名前順で返され、未設定の名前はアドレスになる
        // given (前提条件):
        let (registry, directory) = create_test_stores();
        let usecase = GetParticipantsUseCase::new(registry.clone(), directory.clone());
        let (carol, _rx1) = create_test_handle(5003);
        let (alice, _rx2) = create_test_handle(5001);
        let (anonymous, _rx3) = create_test_handle(5002);
        registry.add(carol.clone()).await;
        registry.add(alice.clone()).await;
        registry.add(anonymous.clone()).await;
        directory.set_name(&carol, DisplayName::new("carol")).await;
        directory.set_name(&alice, DisplayName::new("alice")).await;

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        let names: Vec<&str> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["127.0.0.1:5002", "alice", "carol"]);
        assert_eq!(result[1].id, alice.id());
    }

    #[tokio::test]
    async fn test_no_participants() {
        // テスト項目: 接続がない場合は空のリストが返される
        // given (前提条件):
        let (registry, directory) = create_test_stores();
        let usecase = GetParticipantsUseCase::new(registry, directory);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        assert!(result.is_empty());
    }
}
