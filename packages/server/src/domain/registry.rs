//! Connection Registry
//!
//! 接続中の参加者 ID の集合。ID が存在する ⇔ その接続が開いている。

use std::collections::HashMap;

use serde_json::Value;

use super::{entity::Participant, error::RegistryError, value_object::ClientId};

#[derive(Debug, Default)]
pub struct Registry {
    participants: HashMap<ClientId, Participant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 参加者を登録する
    ///
    /// 同じ ID がすでに存在する場合は `DuplicateId` を返し、既存の登録は変更しない。
    pub fn register(&mut self, participant: Participant) -> Result<(), RegistryError> {
        if self.participants.contains_key(&participant.id) {
            return Err(RegistryError::DuplicateId(participant.id.into_string()));
        }
        self.participants
            .insert(participant.id.clone(), participant);
        Ok(())
    }

    /// 参加者を削除する。存在しなければ何もしない（重複した切断通知を許容）。
    pub fn unregister(&mut self, id: &ClientId) -> Option<Participant> {
        self.participants.remove(id)
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.participants.contains_key(id)
    }

    /// `excluding` 以外の全参加者 ID（ID 順）
    pub fn list_others(&self, excluding: &ClientId) -> Vec<ClientId> {
        let mut others: Vec<ClientId> = self
            .participants
            .keys()
            .filter(|id| *id != excluding)
            .cloned()
            .collect();
        others.sort();
        others
    }

    /// 全参加者 ID（ID 順）
    pub fn ids(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = self.participants.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get(&self, id: &ClientId) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// 全参加者（接続時刻順）
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn attach_metadata(&mut self, id: &ClientId, metadata: Value) -> Result<(), RegistryError> {
        self.participants
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotRegistered(id.to_string()))?
            .attach_metadata(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use serde_json::json;

    fn participant(id: &str, connected_at: i64) -> Participant {
        Participant::new(
            ClientId::new(id.to_string()).unwrap(),
            Timestamp::new(connected_at),
        )
    }

    fn id(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_register_and_contains() {
        // テスト項目: 登録した ID は contains で true になる
        // given (前提条件):
        let mut registry = Registry::new();

        // when (操作):
        let result = registry.register(participant("alice", 1000));

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(registry.contains(&id("alice")));
        assert!(!registry.contains(&id("bob")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_id_is_rejected() {
        // テスト項目: 同じ ID の二重登録は DuplicateId になり、既存の登録は残る
        // given (前提条件):
        let mut registry = Registry::new();
        registry
            .register(participant("alice", 1000).with_metadata(json!("first")))
            .unwrap();

        // when (操作):
        let result = registry.register(participant("alice", 2000));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::DuplicateId("alice".to_string())));
        let kept = registry.get(&id("alice")).unwrap();
        assert_eq!(kept.connected_at, Timestamp::new(1000));
        assert_eq!(kept.metadata, Some(json!("first")));
    }

    #[test]
    fn test_unregister_absent_id_is_noop() {
        // テスト項目: 存在しない ID の削除は何もしない（冪等性）
        // given (前提条件):
        let mut registry = Registry::new();
        registry.register(participant("alice", 1000)).unwrap();

        // when (操作):
        let first = registry.unregister(&id("alice"));
        let second = registry.unregister(&id("alice"));

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_others_excludes_given_id() {
        // テスト項目: list_others は指定した ID を除いた ID を返す
        // given (前提条件):
        let mut registry = Registry::new();
        registry.register(participant("charlie", 3000)).unwrap();
        registry.register(participant("alice", 1000)).unwrap();
        registry.register(participant("bob", 2000)).unwrap();

        // when (操作):
        let others = registry.list_others(&id("alice"));

        // then (期待する結果):
        assert_eq!(others, vec![id("bob"), id("charlie")]);
    }

    #[test]
    fn test_list_others_for_unknown_id_returns_everyone() {
        // テスト項目: 未登録の ID を除外指定すると全員が返る
        // given (前提条件):
        let mut registry = Registry::new();
        registry.register(participant("alice", 1000)).unwrap();

        // when (操作):
        let others = registry.list_others(&id("zed"));

        // then (期待する結果):
        assert_eq!(others, vec![id("alice")]);
    }

    #[test]
    fn test_participants_sorted_by_connected_at() {
        // テスト項目: participants は接続時刻順に並ぶ
        // given (前提条件):
        let mut registry = Registry::new();
        registry.register(participant("alice", 3000)).unwrap();
        registry.register(participant("bob", 1000)).unwrap();

        // when (操作):
        let participants = registry.participants();

        // then (期待する結果):
        assert_eq!(participants[0].id, id("bob"));
        assert_eq!(participants[1].id, id("alice"));
    }

    #[test]
    fn test_attach_metadata_to_unknown_id() {
        // テスト項目: 未登録の ID へのメタデータ設定は NotRegistered になる
        // given (前提条件):
        let mut registry = Registry::new();

        // when (操作):
        let result = registry.attach_metadata(&id("ghost"), json!({"name": "Ghost"}));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::NotRegistered("ghost".to_string())));
    }
}
