//! UseCase: 参加者メタデータの登録（`registerUser`）

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ChannelRepository, ClientId};

use super::error::RegisterMetadataError;

pub struct RegisterMetadataUseCase {
    repository: Arc<dyn ChannelRepository>,
}

impl RegisterMetadataUseCase {
    pub fn new(repository: Arc<dyn ChannelRepository>) -> Self {
        Self { repository }
    }

    /// メタデータは一度だけ登録できる
    pub async fn execute(
        &self,
        client_id: &ClientId,
        metadata: Value,
    ) -> Result<(), RegisterMetadataError> {
        self.repository
            .attach_metadata(client_id, metadata)
            .await
            .map_err(RegisterMetadataError::from)?;
        tracing::info!("Metadata registered for '{}'", client_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Harness;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_metadata_once() {
        // テスト項目: メタデータを登録でき、二度目は AlreadyRegistered になる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = RegisterMetadataUseCase::new(harness.repository.clone());
        let (alice, _alice_inbox) = harness.join("alice").await;

        // when (操作):
        let first = usecase.execute(&alice, json!({"name": "Alice"})).await;
        let second = usecase.execute(&alice, json!({"name": "Mallory"})).await;

        // then (期待する結果):
        assert_eq!(first, Ok(()));
        assert_eq!(
            second,
            Err(RegisterMetadataError::AlreadyRegistered("alice".to_string()))
        );
        let participants = harness.repository.get_participants().await;
        assert_eq!(participants[0].metadata, Some(json!({"name": "Alice"})));
    }

    #[tokio::test]
    async fn test_register_metadata_for_unknown_client() {
        // テスト項目: 未接続のクライアントへの登録は NotConnected になる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = RegisterMetadataUseCase::new(harness.repository.clone());
        let ghost = ClientId::new("ghost".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&ghost, json!({"name": "Ghost"})).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RegisterMetadataError::NotConnected("ghost".to_string()))
        );
    }
}
