//! Entities

use serde::Serialize;
use serde_json::Value;

use super::{
    error::RegistryError,
    value_object::{ClientId, Timestamp},
};

/// 接続中の参加者
///
/// Registry が唯一の所有者。他のコンポーネントは ID でのみ参照する。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub id: ClientId,
    pub connected_at: Timestamp,
    /// `registerUser` で一度だけ設定できる任意の情報
    pub metadata: Option<Value>,
}

impl Participant {
    pub fn new(id: ClientId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// メタデータを設定する（二度目以降はエラー）
    pub fn attach_metadata(&mut self, metadata: Value) -> Result<(), RegistryError> {
        if self.metadata.is_some() {
            return Err(RegistryError::MetadataAlreadySet(self.id.to_string()));
        }
        self.metadata = Some(metadata);
        Ok(())
    }
}
