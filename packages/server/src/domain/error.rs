//! Domain errors.

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client id must not be empty")]
    ClientIdEmpty,

    #[error("client id is too long ({0} bytes)")]
    ClientIdTooLong(usize),
}

/// Connection Registry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同じ ID がすでに登録されている（トランスポート層のバグを示す）
    #[error("client '{0}' is already registered")]
    DuplicateId(String),

    /// 登録されていない ID に対する操作
    #[error("client '{0}' is not registered")]
    NotRegistered(String),

    /// メタデータは一度しか設定できない
    #[error("metadata for client '{0}' is already set")]
    MetadataAlreadySet(String),
}

/// Signaling Relay のエラー
///
/// どちらも送信者には通知せず、ログに残して破棄する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("relay target '{0}' is not connected")]
    UnknownTarget(String),

    #[error("{kind} is missing required field '{field}'")]
    MalformedPayload {
        kind: &'static str,
        field: &'static str,
    },
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' has no open channel")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
