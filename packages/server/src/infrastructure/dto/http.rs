//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::Participant;

/// One registered connection as exposed by `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub connection_id: String,
    pub name: String,
    pub remote_addr: String,
}

impl From<Participant> for ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            connection_id: model.id.to_string(),
            name: model.name.into_string(),
            remote_addr: model.remote_addr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName};

    #[test]
    fn test_participant_to_dto_serializes_flat_fields() {
        // テスト項目: Participant が JSON のフラットな DTO に変換される
        // given (前提条件):
        let id = ConnectionId::generate();
        let participant = Participant {
            id,
            name: DisplayName::new("Alice"),
            remote_addr: "127.0.0.1:5000".parse().unwrap(),
        };

        // when (操作):
        let dto = ParticipantDto::from(participant);
        let json = serde_json::to_value(&dto).unwrap();

        // then (期待する結果):
        assert_eq!(json["connection_id"], id.to_string());
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["remote_addr"], "127.0.0.1:5000");
    }
}
